use ratatui::style::Style;

use super::{Flow, cells};
use crate::ui::{Surface, reflow};

/// Forces a flow break without painting anything.
pub struct SeparatorField {
    pub flow: Flow,
}

impl SeparatorField {
    pub fn new(flow: Flow) -> Self {
        Self { flow }
    }
}

/// A single unwrapped line.
pub struct TextField {
    text: String,
    style: Style,
    pub flow: Flow,
}

impl TextField {
    pub fn new(text: impl Into<String>, style: Style, flow: Flow) -> Self {
        Self {
            text: text.into(),
            style,
            flow,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> u16 {
        cells(self.text.chars().count())
    }

    pub fn render(&self, surface: &mut dyn Surface, x: i32, y: i32) {
        surface.add_wrapped_text(&self.text, x, y, self.style);
    }
}

/// Text reflowed to whatever width the arranger offers it.
pub struct WrappedTextField {
    text: String,
    style: Style,
    pub flow: Flow,
    centred: bool,
    wrapped_width: Option<i32>,
    lines: Vec<String>,
    reflows: usize,
}

impl WrappedTextField {
    pub fn new(text: impl Into<String>, style: Style, flow: Flow) -> Self {
        Self {
            text: text.into(),
            style,
            flow,
            centred: false,
            wrapped_width: None,
            lines: Vec::new(),
            reflows: 0,
        }
    }

    pub fn centred(mut self) -> Self {
        self.centred = true;
        self
    }

    /// Reflow only if the width actually changed.
    pub fn update_width(&mut self, available: i32) {
        if self.wrapped_width != Some(available) {
            self.wrapped_width = Some(available);
            self.lines = reflow(&self.text, usize::try_from(available).unwrap_or(0));
            self.reflows += 1;
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// How many times the text has been reflowed.
    pub fn reflow_count(&self) -> usize {
        self.reflows
    }

    pub fn width(&self) -> u16 {
        self.lines
            .iter()
            .map(|line| cells(line.chars().count()))
            .max()
            .unwrap_or(1)
            .max(1)
    }

    pub fn height(&self) -> u16 {
        cells(self.lines.len()).max(1)
    }

    pub fn render(&self, surface: &mut dyn Surface, x: i32, y: i32) {
        let wrapped_width = self.wrapped_width.unwrap_or(0);
        for (row, line) in self.lines.iter().enumerate() {
            let offset = if self.centred {
                (wrapped_width - line.chars().count() as i32) / 2
            } else {
                0
            };
            surface.add_text(line, x + offset, y + row as i32, self.style);
        }
    }
}
