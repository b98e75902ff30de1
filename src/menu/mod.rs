//! Priority-ordered selection menus and the registry that navigates them.

use std::fmt;

use crate::key::Key;

pub mod navigator;

pub use navigator::{MenuNavigator, ROOT_MENU};

pub type MenuKey = String;

/// Opaque value handed back to a choice's callbacks, e.g. a VM reference.
pub type ChoiceHandle = String;

pub type ChoiceAction = Box<dyn FnMut(Option<&ChoiceHandle>)>;

const FIRST_DEFAULT_PRIORITY: i32 = 1000;
const PRIORITY_STEP: i32 = 100;

/// One selectable entry.
pub struct ChoiceDef {
    name: String,
    on_preview: Option<ChoiceAction>,
    on_commit: Option<ChoiceAction>,
    priority: Option<i32>,
    handle: Option<ChoiceHandle>,
}

impl ChoiceDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_preview: None,
            on_commit: None,
            priority: None,
            handle: None,
        }
    }

    /// Called whenever this choice becomes the current one.
    pub fn on_preview(mut self, action: impl FnMut(Option<&ChoiceHandle>) + 'static) -> Self {
        self.on_preview = Some(Box::new(action));
        self
    }

    /// Called when this choice is selected with Enter or Right.
    pub fn on_commit(mut self, action: impl FnMut(Option<&ChoiceHandle>) + 'static) -> Self {
        self.on_commit = Some(Box::new(action));
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn handle(mut self, handle: impl Into<ChoiceHandle>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_commit(&self) -> bool {
        self.on_commit.is_some()
    }

    fn preview(&mut self) {
        if let Some(action) = self.on_preview.as_mut() {
            action(self.handle.as_ref());
        }
    }

    fn commit(&mut self) {
        if let Some(action) = self.on_commit.as_mut() {
            action(self.handle.as_ref());
        }
    }
}

impl fmt::Debug for ChoiceDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceDef")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// What the navigator should do after a menu saw a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuResponse {
    Handled,
    Unhandled,
    /// Switch to the named menu (back navigation).
    ChangeMenu(MenuKey),
}

#[derive(Debug)]
pub struct Menu {
    title: String,
    parent: Option<MenuKey>,
    choices: Vec<ChoiceDef>,
    choice_index: usize,
    default_priority: i32,
}

impl Menu {
    pub fn new(title: impl Into<String>, parent: Option<MenuKey>) -> Self {
        Self {
            title: title.into(),
            parent,
            choices: Vec::new(),
            choice_index: 0,
            default_priority: FIRST_DEFAULT_PRIORITY,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn set_parent(&mut self, parent: Option<MenuKey>) {
        self.parent = parent;
    }

    pub fn choices(&self) -> &[ChoiceDef] {
        &self.choices
    }

    pub fn choice_index(&self) -> usize {
        self.choice_index
    }

    /// Insert keeping priority order. Without a priority, the next default
    /// (1000, 1100, ...) is assigned; equal priorities keep insertion order.
    pub fn add_choice_def(&mut self, mut choice: ChoiceDef, priority: Option<i32>) {
        let priority = match priority.or(choice.priority) {
            Some(p) => p,
            None => {
                let p = self.default_priority;
                self.default_priority += PRIORITY_STEP;
                p
            }
        };
        choice.priority = Some(priority);
        self.choices.push(choice);
        self.choices.sort_by_key(|c| c.priority);
    }

    pub fn remove_choices(&mut self) {
        self.choices.clear();
        self.default_priority = FIRST_DEFAULT_PRIORITY;
        self.clamp_index();
    }

    pub fn set_current_choice(&mut self, index: usize) {
        self.choice_index = index;
        self.clamp_index();
    }

    pub fn current_choice(&mut self) -> Option<&ChoiceDef> {
        self.clamp_index();
        self.choices.get(self.choice_index)
    }

    /// Run the current choice's preview callback.
    pub fn preview_current(&mut self) {
        self.clamp_index();
        if let Some(choice) = self.choices.get_mut(self.choice_index) {
            choice.preview();
        }
    }

    pub fn commit_current(&mut self) {
        self.clamp_index();
        if let Some(choice) = self.choices.get_mut(self.choice_index) {
            choice.commit();
        }
    }

    pub fn handle_key(&mut self, key: Key) -> MenuResponse {
        match key {
            Key::Down => {
                if !self.choices.is_empty() {
                    self.choice_index = (self.choice_index + 1) % self.choices.len();
                }
                self.preview_current();
                MenuResponse::Handled
            }
            Key::Up => {
                let count = self.choices.len();
                if count > 0 {
                    self.choice_index = (self.choice_index.min(count - 1) + count - 1) % count;
                }
                self.preview_current();
                MenuResponse::Handled
            }
            Key::Left | Key::Escape => match &self.parent {
                Some(parent) => MenuResponse::ChangeMenu(parent.clone()),
                None => MenuResponse::Unhandled,
            },
            Key::Enter | Key::Right => {
                self.commit_current();
                MenuResponse::Handled
            }
            Key::Char(ch) if ch.is_alphabetic() => {
                if self.jump_to_letter(ch) {
                    MenuResponse::Handled
                } else {
                    MenuResponse::Unhandled
                }
            }
            _ => MenuResponse::Unhandled,
        }
    }

    /// Move to the next choice after the current one whose name starts with
    /// `letter`, wrapping around.
    fn jump_to_letter(&mut self, letter: char) -> bool {
        let count = self.choices.len();
        let wanted: Vec<char> = letter.to_lowercase().collect();
        let found = (1..=count)
            .map(|step| (self.choice_index + step) % count)
            .find(|&i| {
                self.choices[i]
                    .name
                    .chars()
                    .next()
                    .is_some_and(|first| first.to_lowercase().eq(wanted.iter().copied()))
            });
        match found {
            Some(index) => {
                self.choice_index = index;
                self.preview_current();
                true
            }
            None => false,
        }
    }

    fn clamp_index(&mut self) {
        if self.choice_index >= self.choices.len() {
            self.choice_index = self.choices.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn menu(names: &[&str]) -> Menu {
        let mut menu = Menu::new("Test", None);
        for name in names {
            menu.add_choice_def(ChoiceDef::new(*name), None);
        }
        menu
    }

    fn names(menu: &Menu) -> Vec<&str> {
        menu.choices().iter().map(ChoiceDef::name).collect()
    }

    #[test]
    fn letter_jump_searches_after_current() {
        let mut menu = menu(&["Apple", "Banana", "Cherry", "Avocado"]);
        assert_eq!(menu.handle_key(Key::Char('a')), MenuResponse::Handled);
        assert_eq!(menu.choice_index(), 3);
        // wraps back round to Apple
        menu.handle_key(Key::Char('A'));
        assert_eq!(menu.choice_index(), 0);
        assert_eq!(menu.handle_key(Key::Char('z')), MenuResponse::Unhandled);
        assert_eq!(menu.choice_index(), 0);
    }

    #[test]
    fn arrows_wrap_and_preview() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut menu = Menu::new("Test", None);
        for name in ["one", "two", "three"] {
            let seen = Rc::clone(&seen);
            menu.add_choice_def(
                ChoiceDef::new(name)
                    .handle(name)
                    .on_preview(move |h| seen.borrow_mut().push(h.cloned().unwrap_or_default())),
                None,
            );
        }
        menu.handle_key(Key::Up);
        assert_eq!(menu.choice_index(), 2);
        menu.handle_key(Key::Down);
        assert_eq!(menu.choice_index(), 0);
        assert_eq!(*seen.borrow(), vec!["three", "one"]);
    }

    #[test]
    fn commit_runs_current_choice() {
        let committed = Rc::new(RefCell::new(None));
        let mut menu = Menu::new("Test", None);
        menu.add_choice_def(ChoiceDef::new("first"), None);
        let sink = Rc::clone(&committed);
        menu.add_choice_def(
            ChoiceDef::new("second")
                .handle("vm-2")
                .on_commit(move |h| *sink.borrow_mut() = h.cloned()),
            None,
        );
        menu.set_current_choice(1);
        assert_eq!(menu.handle_key(Key::Right), MenuResponse::Handled);
        assert_eq!(committed.borrow().as_deref(), Some("vm-2"));
    }

    #[test]
    fn priorities_sort_with_stable_ties() {
        let mut menu = menu(&["a", "b"]);
        menu.add_choice_def(ChoiceDef::new("first"), Some(10));
        menu.add_choice_def(ChoiceDef::new("tie"), Some(1000));
        menu.add_choice_def(ChoiceDef::new("own").priority(1050), None);
        assert_eq!(names(&menu), vec!["first", "a", "tie", "own", "b"]);
    }

    #[test]
    fn back_needs_a_parent() {
        let mut root = menu(&["x"]);
        assert_eq!(root.handle_key(Key::Escape), MenuResponse::Unhandled);
        let mut child = Menu::new("Child", Some("MENU_ROOT".to_string()));
        assert_eq!(
            child.handle_key(Key::Left),
            MenuResponse::ChangeMenu("MENU_ROOT".to_string())
        );
    }

    #[test]
    fn index_clamps_when_choices_shrink() {
        let mut menu = menu(&["a", "b", "c"]);
        menu.set_current_choice(9);
        assert_eq!(menu.choice_index(), 2);
        menu.remove_choices();
        assert_eq!(menu.choice_index(), 0);
        assert!(menu.current_choice().is_none());
        // default priorities restart
        menu.add_choice_def(ChoiceDef::new("z"), None);
        menu.add_choice_def(ChoiceDef::new("y"), Some(1000));
        assert_eq!(names(&menu), vec!["z", "y"]);
    }

    #[test]
    fn unknown_keys_are_unhandled() {
        let mut menu = menu(&["a"]);
        assert_eq!(menu.handle_key(Key::PageDown), MenuResponse::Unhandled);
        assert_eq!(menu.handle_key(Key::Char('1')), MenuResponse::Unhandled);
    }
}
