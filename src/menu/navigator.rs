use std::collections::HashMap;

use tracing::debug;

use super::{ChoiceDef, Menu, MenuKey, MenuResponse};
use crate::error::MenuError;
use crate::key::Key;

pub const ROOT_MENU: &str = "MENU_ROOT";

/// Owns every menu by key and tracks which one is showing. Menus refer to
/// their parent by key only, so a child outlives nothing it points at.
pub struct MenuNavigator {
    menus: HashMap<MenuKey, Menu>,
    current: MenuKey,
}

impl MenuNavigator {
    pub fn new(root_title: impl Into<String>) -> Self {
        let mut menus = HashMap::new();
        menus.insert(ROOT_MENU.to_string(), Menu::new(root_title, None));
        Self {
            menus,
            current: ROOT_MENU.to_string(),
        }
    }

    pub fn menu(&self, key: &str) -> Result<&Menu, MenuError> {
        self.menus
            .get(key)
            .ok_or_else(|| MenuError::UnknownMenu(key.to_string()))
    }

    pub fn menu_mut(&mut self, key: &str) -> Result<&mut Menu, MenuError> {
        self.menus
            .get_mut(key)
            .ok_or_else(|| MenuError::UnknownMenu(key.to_string()))
    }

    pub fn current_key(&self) -> &str {
        &self.current
    }

    pub fn current_menu(&self) -> Result<&Menu, MenuError> {
        self.menu(&self.current)
    }

    pub fn current_menu_mut(&mut self) -> Result<&mut Menu, MenuError> {
        let key = self.current.clone();
        self.menu_mut(&key)
    }

    /// Show another menu and preview its current choice.
    pub fn change_menu(&mut self, key: &str) -> Result<(), MenuError> {
        let menu = self.menu_mut(key)?;
        menu.preview_current();
        debug!(from = %self.current, to = key, "menu changed");
        self.current = key.to_string();
        Ok(())
    }

    /// Back to the root menu with every menu on its first choice.
    pub fn reset(&mut self) -> Result<(), MenuError> {
        for menu in self.menus.values_mut() {
            menu.set_current_choice(0);
        }
        self.current = ROOT_MENU.to_string();
        self.current_menu_mut()?.preview_current();
        Ok(())
    }

    pub fn add_choice(
        &mut self,
        menu_key: &str,
        choice: ChoiceDef,
        priority: Option<i32>,
    ) -> Result<(), MenuError> {
        self.menu_mut(menu_key)?.add_choice_def(choice, priority);
        Ok(())
    }

    /// Create a menu on first mention. Title and parent may arrive in a later
    /// call, which then fills them in.
    pub fn create_menu_if_not_present(
        &mut self,
        key: &str,
        title: Option<&str>,
        parent: Option<&str>,
    ) {
        match self.menus.get_mut(key) {
            Some(menu) => {
                if let Some(parent) = parent {
                    menu.set_parent(Some(parent.to_string()));
                }
                if let Some(title) = title {
                    menu.set_title(title);
                }
            }
            None => {
                let menu = Menu::new(title.unwrap_or_default(), parent.map(str::to_string));
                self.menus.insert(key.to_string(), menu);
            }
        }
    }

    /// Route a key to the current menu, following back navigation.
    pub fn handle_key(&mut self, key: Key) -> Result<bool, MenuError> {
        match self.current_menu_mut()?.handle_key(key) {
            MenuResponse::Handled => Ok(true),
            MenuResponse::Unhandled => Ok(false),
            MenuResponse::ChangeMenu(target) => {
                self.change_menu(&target)?;
                Ok(true)
            }
        }
    }
}
