use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single keystroke as seen by panes, inputs and menus.
///
/// Named keys and literal characters are separate classes: `Key::Char('a')`
/// is never confused with a named key, even one whose symbolic name is a
/// single letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    Backspace,
    PageUp,
    PageDown,
    Enter,
    Escape,
    Tab,
    BackTab,
    F(u8),
    Char(char),
}

const NAMED: &[(&str, Key)] = &[
    ("KEY_UP", Key::Up),
    ("KEY_DOWN", Key::Down),
    ("KEY_LEFT", Key::Left),
    ("KEY_RIGHT", Key::Right),
    ("KEY_HOME", Key::Home),
    ("KEY_END", Key::End),
    ("KEY_DC", Key::Delete),
    ("KEY_BACKSPACE", Key::Backspace),
    ("KEY_PPAGE", Key::PageUp),
    ("KEY_NPAGE", Key::PageDown),
    ("KEY_ENTER", Key::Enter),
    ("KEY_ESCAPE", Key::Escape),
    ("KEY_TAB", Key::Tab),
    ("KEY_BTAB", Key::BackTab),
];

impl Key {
    /// Symbolic name, e.g. `KEY_DC`. Characters render as themselves.
    pub fn name(self) -> String {
        match self {
            Key::Char(ch) => ch.to_string(),
            Key::F(n) => format!("KEY_F({n})"),
            named => NAMED
                .iter()
                .find(|(_, k)| *k == named)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse a symbolic key name or a single printable character.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some((_, key)) = NAMED.iter().find(|(n, _)| *n == name) {
            return Some(*key);
        }
        if let Some(num) = name
            .strip_prefix("KEY_F(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return num.parse().ok().map(Key::F);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(Key::Char(ch)),
            _ => None,
        }
    }

    /// Cursor/selection movement keys that never edit text.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Key::Left | Key::Right | Key::Home | Key::End | Key::Up | Key::Down
        )
    }
}

/// Terminal key events without a [`Key`] counterpart (modified keys, control
/// characters, media keys) are handed back unchanged.
impl TryFrom<KeyEvent> for Key {
    type Error = KeyEvent;

    fn try_from(event: KeyEvent) -> Result<Self, Self::Error> {
        if event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Err(event);
        }
        let key = match event.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Delete => Key::Delete,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::F(n) => Key::F(n),
            KeyCode::Char(ch) if !ch.is_control() => Key::Char(ch),
            _ => return Err(event),
        };
        Ok(key)
    }
}

/// Parse a comma- or whitespace-separated list of key names.
pub fn parse_key_script(script: &str) -> Option<Vec<Key>> {
    script
        .split([',', ' '])
        .filter(|s| !s.is_empty())
        .map(Key::from_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_for_named_keys() {
        for (name, key) in NAMED {
            assert_eq!(Key::from_name(name), Some(*key));
            assert_eq!(key.name(), *name);
        }
        assert_eq!(Key::from_name("KEY_F(5)"), Some(Key::F(5)));
    }

    #[test]
    fn single_characters_are_literal() {
        assert_eq!(Key::from_name("a"), Some(Key::Char('a')));
        assert_eq!(Key::from_name("KEY_BOGUS"), None);
        assert_eq!(Key::from_name(""), None);
    }

    #[test]
    fn control_modified_events_are_rejected() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Key::try_from(ev), Err(ev));
        let ev = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(Key::try_from(ev), Ok(Key::Char('x')));
        let ev = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(Key::try_from(ev), Ok(Key::Escape));
    }

    #[test]
    fn shifted_characters_are_kept() {
        let ev = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(Key::try_from(ev), Ok(Key::Char('Q')));
        let ev = KeyEvent::new(KeyCode::Char('\u{7}'), KeyModifiers::NONE);
        assert!(Key::try_from(ev).is_err());
        let ev = KeyEvent::new(KeyCode::CapsLock, KeyModifiers::NONE);
        assert!(Key::try_from(ev).is_err());
    }

    #[test]
    fn key_script_parses_mixed_tokens() {
        let keys = parse_key_script("KEY_DOWN, a KEY_ENTER").unwrap();
        assert_eq!(keys, vec![Key::Down, Key::Char('a'), Key::Enter]);
        assert!(parse_key_script("KEY_NOPE").is_none());
    }
}
