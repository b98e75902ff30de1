// Library target shared by the binary, the integration tests and the
// criterion benchmarks.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod fields;
pub mod key;
pub mod logging;
pub mod menu;
pub mod pane;
pub mod ui;

pub use error::{Error, LayoutError, MenuError, Result};
pub use key::Key;
