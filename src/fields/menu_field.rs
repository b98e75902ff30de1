use ratatui::style::Style;

use super::{Flow, cells};
use crate::menu::Menu;
use crate::ui::Surface;

/// A fixed-height scrolling view of a menu's choices.
///
/// The field copies choice names and the current index out of the menu, so
/// the menu itself stays owned by its navigator. Call [`MenuField::sync`]
/// after the menu changes.
pub struct MenuField {
    names: Vec<String>,
    choice_index: usize,
    height: usize,
    scroll_point: usize,
    style: Style,
    highlight: Style,
    pub flow: Flow,
}

impl MenuField {
    pub fn new(menu: &Menu, style: Style, highlight: Style, height: usize, flow: Flow) -> Self {
        let mut field = Self {
            names: Vec::new(),
            choice_index: 0,
            height,
            scroll_point: 0,
            style,
            highlight,
            flow,
        };
        field.sync(menu);
        field.height = height.min(field.names.len());
        field
    }

    pub fn sync(&mut self, menu: &Menu) {
        self.names = menu.choices().iter().map(|c| c.name().to_string()).collect();
        self.choice_index = menu.choice_index();
    }

    pub fn scroll_point(&self) -> usize {
        self.scroll_point
    }

    pub fn width(&self) -> u16 {
        self.names
            .iter()
            .map(|name| cells(name.chars().count()))
            .max()
            .unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        cells(self.height)
    }

    pub fn render(&mut self, surface: &mut dyn Surface, x: i32, y: i32) {
        if self.height == 0 {
            return;
        }
        let current = self.choice_index;
        if self.scroll_point > current {
            self.scroll_point = current;
        } else if self.scroll_point + self.height <= current {
            self.scroll_point = current + 1 - self.height;
        }

        let rows = self
            .height
            .min(self.names.len().saturating_sub(self.scroll_point));
        for row in 0..rows {
            let index = self.scroll_point + row;
            let style = if index == current {
                self.highlight
            } else {
                self.style
            };
            surface.add_text(&self.names[index], x, y + row as i32, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::ChoiceDef;
    use crate::ui::BufferWindow;
    use ratatui::layout::Rect;

    fn menu(names: &[&str]) -> Menu {
        let mut menu = Menu::new("Test", None);
        for name in names {
            menu.add_choice_def(ChoiceDef::new(*name), None);
        }
        menu
    }

    fn render(field: &mut MenuField) -> BufferWindow {
        let mut win = BufferWindow::new(Rect::new(0, 0, 20, 5));
        win.erase();
        field.render(&mut win, 0, 0);
        win.refresh();
        win
    }

    #[test]
    fn scroll_point_follows_current_choice() {
        let mut menu = menu(&["a", "b", "c", "d", "e"]);
        let mut field = MenuField::new(&menu, Style::default(), Style::default(), 2, Flow::Return);

        menu.set_current_choice(4);
        field.sync(&menu);
        let win = render(&mut field);
        assert_eq!(field.scroll_point(), 3);
        assert_eq!(win.snapshot().rows[..2], ["d", "e"]);

        menu.set_current_choice(0);
        field.sync(&menu);
        render(&mut field);
        assert_eq!(field.scroll_point(), 0);
    }

    #[test]
    fn height_is_clamped_to_choice_count() {
        let menu = menu(&["Alpha", "Be"]);
        let field = MenuField::new(&menu, Style::default(), Style::default(), 10, Flow::Return);
        assert_eq!(field.height(), 2);
        assert_eq!(field.width(), 5);
    }

    #[test]
    fn empty_menu_has_zero_width() {
        let menu = Menu::new("Empty", None);
        let mut field = MenuField::new(&menu, Style::default(), Style::default(), 4, Flow::Return);
        assert_eq!(field.width(), 0);
        let win = render(&mut field);
        assert!(win.snapshot().rows.iter().all(String::is_empty));
    }
}
