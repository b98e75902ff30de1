use ratatui::style::Style;

use super::{Flow, cells};
use crate::key::Key;
use crate::ui::Surface;

/// Minimum rendered width of an input box.
pub const INPUT_MIN_WIDTH: usize = 40;
pub const DEFAULT_LENGTH_LIMIT: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputState {
    Inactive,
    /// Focused, with the whole text selected. The next edit replaces it.
    Selected,
    Editing,
}

/// Single-line editable text box.
pub struct InputField {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    /// First visible char when the text is wider than the box.
    scroll: usize,
    width: usize,
    length_limit: usize,
    hide_text: bool,
    state: InputState,
    style: Style,
    selected_style: Style,
    pub flow: Flow,
}

impl InputField {
    pub fn new(
        text: impl Into<String>,
        style: Style,
        selected_style: Style,
        flow: Flow,
        length_limit: Option<usize>,
    ) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            scroll: 0,
            width: INPUT_MIN_WIDTH,
            length_limit: length_limit.unwrap_or(DEFAULT_LENGTH_LIMIT),
            hide_text: false,
            state: InputState::Inactive,
            style,
            selected_style,
            flow,
        }
    }

    /// Render a mask instead of the content.
    pub fn hide_text(&mut self) {
        self.hide_text = true;
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != InputState::Inactive
    }

    pub fn activate(&mut self) {
        self.cursor = self.len();
        self.state = if self.text.is_empty() {
            InputState::Editing
        } else {
            InputState::Selected
        };
    }

    pub fn deactivate(&mut self) {
        self.state = InputState::Inactive;
    }

    pub fn update_width(&mut self, available: i32) {
        self.width = INPUT_MIN_WIDTH.max(usize::try_from(available).unwrap_or(0));
    }

    pub fn width(&self) -> u16 {
        cells(INPUT_MIN_WIDTH.max(self.len()))
    }

    /// Apply a keystroke. Returns false for keys this field does not use,
    /// which the caller should route elsewhere.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !Self::takes(key) {
            return false;
        }
        if self.state == InputState::Selected {
            match key {
                Key::Left | Key::Home => self.cursor = 0,
                nav if nav.is_navigation() => {}
                _ => self.text.clear(),
            }
            self.state = InputState::Editing;
        }
        self.cursor = self.cursor.min(self.len());

        match key {
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.len()),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.len(),
            Key::Delete => {
                if self.cursor < self.len() {
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.remove(byte_offset);
                }
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.remove(byte_offset);
                }
            }
            Key::Char(ch) => {
                if self.len() < self.length_limit {
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.insert(byte_offset, ch);
                    self.cursor += 1;
                }
            }
            _ => {}
        }
        true
    }

    /// Keys an input edits with. Anything else is left for the caller.
    fn takes(key: Key) -> bool {
        match key {
            Key::Left | Key::Right | Key::Home | Key::End | Key::Delete | Key::Backspace => true,
            Key::Char(ch) => !ch.is_control(),
            _ => false,
        }
    }

    pub fn render(&mut self, surface: &mut dyn Surface, x: i32, y: i32) {
        let selected = self.state == InputState::Selected;
        let (style, suffix) = if selected {
            (self.selected_style, "")
        } else {
            (self.style, " ")
        };

        // Keep the cursor inside the visible window
        self.scroll = self.scroll.min(self.cursor);
        self.scroll = self.scroll.max((self.cursor + 1).saturating_sub(self.width));

        let visible: String = self.text.chars().skip(self.scroll).take(self.width).collect();
        let shown_len = visible.chars().count();
        let shown = if self.hide_text {
            "*".repeat(shown_len)
        } else {
            visible
        };
        surface.add_text(&format!("{shown}{suffix}"), x, y, style);
        if selected {
            surface.add_text(" ", x + shown_len as i32, y, self.style);
        }

        if self.is_active() {
            surface.cursor_on(x + (self.cursor - self.scroll) as i32, y);
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::BufferWindow;
    use ratatui::layout::{Position, Rect};

    fn input(text: &str) -> InputField {
        InputField::new(text, Style::default(), Style::default(), Flow::Return, None)
    }

    #[test]
    fn first_key_replaces_selected_text() {
        let mut field = input("hello");
        field.activate();
        assert_eq!(field.state(), InputState::Selected);
        assert!(field.handle_key(Key::Char('x')));
        assert_eq!(field.value(), "x");
        assert_eq!(field.cursor(), 1);
        assert_eq!(field.state(), InputState::Editing);

        field.handle_key(Key::Left);
        assert_eq!(field.cursor(), 0);
        assert_eq!(field.value(), "x");
    }

    #[test]
    fn navigation_keeps_selected_text() {
        let mut field = input("hello");
        field.activate();
        field.handle_key(Key::Home);
        assert_eq!(field.value(), "hello");
        assert_eq!(field.cursor(), 0);

        let mut field = input("hello");
        field.activate();
        field.handle_key(Key::Up);
        assert_eq!(field.value(), "hello");
        assert_eq!(field.cursor(), 5);
    }

    #[test]
    fn backspace_while_selected_clears_everything() {
        let mut field = input("hello");
        field.activate();
        field.handle_key(Key::Backspace);
        assert_eq!(field.value(), "");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn insert_at_start_middle_end() {
        let mut field = input("ac");
        field.handle_key(Key::Char('d'));
        assert_eq!(field.value(), "acd");

        field.handle_key(Key::Home);
        field.handle_key(Key::Char('z'));
        assert_eq!(field.value(), "zacd");
        assert_eq!(field.cursor(), 1);

        field.handle_key(Key::Right);
        field.handle_key(Key::Char('b'));
        assert_eq!(field.value(), "zabcd");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn delete_and_backspace_at_boundaries() {
        let mut field = input("ab");
        field.handle_key(Key::Delete);
        assert_eq!(field.value(), "ab");

        field.handle_key(Key::Home);
        field.handle_key(Key::Backspace);
        assert_eq!(field.value(), "ab");
        field.handle_key(Key::Delete);
        assert_eq!(field.value(), "b");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn length_limit_rejects_quietly() {
        let mut field =
            InputField::new("abc", Style::default(), Style::default(), Flow::Return, Some(3));
        assert!(field.handle_key(Key::Char('d')));
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn unknown_keys_are_unhandled() {
        let mut field = input("abc");
        assert!(!field.handle_key(Key::Enter));
        assert!(!field.handle_key(Key::PageDown));
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn passed_on_keys_leave_selection_alone() {
        let mut field = input("hello");
        field.activate();
        for key in [Key::PageDown, Key::PageUp, Key::Tab, Key::Escape, Key::F(5), Key::Up] {
            assert!(!field.handle_key(key));
            assert_eq!(field.value(), "hello");
            assert_eq!(field.state(), InputState::Selected);
        }
        assert!(field.handle_key(Key::Char('x')));
        assert_eq!(field.value(), "x");
    }

    #[test]
    fn deactivate_keeps_content_and_cursor() {
        let mut field = input("abc");
        field.activate();
        field.handle_key(Key::Left);
        field.deactivate();
        assert_eq!(field.state(), InputState::Inactive);
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn width_has_a_floor() {
        let field = input("short");
        assert_eq!(field.width(), INPUT_MIN_WIDTH as u16);
        let long = input(&"x".repeat(50));
        assert_eq!(long.width(), 50);
    }

    #[test]
    fn render_scrolls_to_keep_cursor_visible() {
        let mut field = input(&"a".repeat(45));
        field.update_width(10);
        field.activate();
        field.handle_key(Key::End);
        let mut win = BufferWindow::new(Rect::new(0, 0, 60, 1));
        win.erase();
        field.render(&mut win, 0, 0);
        win.refresh();
        assert_eq!(field.scroll, 6);
        assert_eq!(win.cursor_position(), Some(Position::new(39, 0)));
        assert_eq!(win.snapshot().row(0), "a".repeat(39));
    }

    #[test]
    fn hidden_text_renders_mask() {
        let mut field = input("secret");
        field.hide_text();
        let mut win = BufferWindow::new(Rect::new(0, 0, 50, 1));
        win.erase();
        field.render(&mut win, 0, 0);
        win.refresh();
        assert_eq!(win.snapshot().row(0), "******");
        assert_eq!(field.value(), "secret");
    }
}
