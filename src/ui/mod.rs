pub mod reflow;
pub mod surface;
pub mod theme;

pub use reflow::reflow;
pub use surface::{BufferWindow, Snapshot, Surface};
pub use theme::{PaneColours, Palette, Theme};
