//! Renderable, measurable units that panes are built from.
//!
//! Every field carries a [`Flow`] directive telling the arranger where the
//! next field goes. Fields are owned by a [`FieldGroup`] arena and referred to
//! elsewhere by [`FieldId`].

use std::str::FromStr;

use crate::ui::Surface;

pub mod arranger;
pub mod group;
pub mod input;
pub mod menu_field;
pub mod text;
pub mod tracker;

pub use arranger::{FieldArranger, FieldLayout, LayoutFrame, LayoutPosition, arrange};
pub use group::{FieldGroup, FieldId};
pub use input::InputField;
pub use menu_field::MenuField;
pub use text::{SeparatorField, TextField, WrappedTextField};
pub use tracker::FieldInputTracker;

/// Minimum content width reported for any layout.
pub const LAYOUT_MIN_WIDTH: i32 = 48;

/// Where the layout cursor moves after placing a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    /// Unset. Laying out a field with this flow is an error.
    #[default]
    Invalid,
    /// Cursor stays put; the next field overlays this one.
    None,
    /// Pack the next field to the right, one cell apart.
    Right,
    /// Start a new line below this field.
    Return,
    /// Start a new line, leaving one blank line.
    DoubleReturn,
}

impl FromStr for Flow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Flow::None),
            "right" => Ok(Flow::Right),
            "return" => Ok(Flow::Return),
            "doublereturn" => Ok(Flow::DoubleReturn),
            other => Err(format!("unknown flow `{other}`")),
        }
    }
}

pub enum Field {
    Separator(SeparatorField),
    Text(TextField),
    Wrapped(WrappedTextField),
    Input(InputField),
    Menu(MenuField),
}

impl Field {
    pub fn flow(&self) -> Flow {
        match self {
            Field::Separator(f) => f.flow,
            Field::Text(f) => f.flow,
            Field::Wrapped(f) => f.flow,
            Field::Input(f) => f.flow,
            Field::Menu(f) => f.flow,
        }
    }

    pub fn width(&self) -> u16 {
        match self {
            Field::Separator(_) => 0,
            Field::Text(f) => f.width(),
            Field::Wrapped(f) => f.width(),
            Field::Input(f) => f.width(),
            Field::Menu(f) => f.width(),
        }
    }

    pub fn height(&self) -> u16 {
        match self {
            Field::Separator(_) | Field::Text(_) | Field::Input(_) => 1,
            Field::Wrapped(f) => f.height(),
            Field::Menu(f) => f.height(),
        }
    }

    /// Tell the field how much horizontal room it has before it is measured.
    pub fn update_width(&mut self, available: i32) {
        match self {
            Field::Wrapped(f) => f.update_width(available),
            Field::Input(f) => f.update_width(available),
            Field::Separator(_) | Field::Text(_) | Field::Menu(_) => {}
        }
    }

    pub fn render(&mut self, surface: &mut dyn Surface, x: i32, y: i32) {
        match self {
            Field::Separator(_) => {}
            Field::Text(f) => f.render(surface, x, y),
            Field::Wrapped(f) => f.render(surface, x, y),
            Field::Input(f) => f.render(surface, x, y),
            Field::Menu(f) => f.render(surface, x, y),
        }
    }

    pub fn as_input(&self) -> Option<&InputField> {
        match self {
            Field::Input(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_input_mut(&mut self) -> Option<&mut InputField> {
        match self {
            Field::Input(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_menu_mut(&mut self) -> Option<&mut MenuField> {
        match self {
            Field::Menu(f) => Some(f),
            _ => None,
        }
    }
}

impl From<SeparatorField> for Field {
    fn from(f: SeparatorField) -> Self {
        Field::Separator(f)
    }
}

impl From<TextField> for Field {
    fn from(f: TextField) -> Self {
        Field::Text(f)
    }
}

impl From<WrappedTextField> for Field {
    fn from(f: WrappedTextField) -> Self {
        Field::Wrapped(f)
    }
}

impl From<InputField> for Field {
    fn from(f: InputField) -> Self {
        Field::Input(f)
    }
}

impl From<MenuField> for Field {
    fn from(f: MenuField) -> Self {
        Field::Menu(f)
    }
}

/// Character count as a cell width.
pub(crate) fn cells(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}
