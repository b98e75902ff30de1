use std::cell::RefCell;
use std::rc::Rc;

use ratatui::layout::Rect;
use tracing::{debug, warn};

use super::status::{HostStatus, StatusPage};
use super::{Action, ActionQueue, DialogueKind};
use crate::error::Result;
use crate::key::Key;
use crate::menu::{ChoiceDef, ChoiceHandle, MenuNavigator, ROOT_MENU};
use crate::pane::{DialoguePane, PaneSizer};
use crate::ui::Theme;

pub const NETWORK_MENU: &str = "MENU_NETWORK";
pub const VM_MENU: &str = "MENU_VM";

/// Rows of a boxed menu pane not available to the menu field: border and
/// key help, plus the title line and its gap.
const MENU_PANE_CHROME: u16 = 7;

/// Handle of the choice most recently previewed, shared with the menu callbacks.
type StatusSlot = Rc<RefCell<Option<ChoiceHandle>>>;

/// The always-present screen: a menu on the left and the status of the
/// highlighted choice on the right.
pub struct RootDialogue {
    navigator: MenuNavigator,
    menu_pane: DialoguePane,
    status_pane: DialoguePane,
    status: StatusSlot,
    /// Handle of the page the status pane currently shows.
    shown: Option<ChoiceHandle>,
    actions: ActionQueue,
    menu_height: usize,
}

/// Split the screen below the two header rows into the menu and status areas.
pub fn split_area(area: Rect) -> (Rect, Rect) {
    let height = area.height.saturating_sub(3);
    let menu_width = (area.width / 2).saturating_sub(1);
    let status_x = area.x + area.width / 2;
    let status_width = area.width.saturating_sub(area.width / 2 + 1);
    (
        Rect::new(area.x + 1, area.y + 2, menu_width, height),
        Rect::new(status_x, area.y + 2, status_width, height),
    )
}

impl RootDialogue {
    pub fn new(
        area: Rect,
        theme: &Theme,
        host: &HostStatus,
        actions: ActionQueue,
        menu_height: usize,
    ) -> Result<Self> {
        let (menu_area, status_area) = split_area(area);
        let mut menu_pane = DialoguePane::new(PaneSizer::Fixed(menu_area), theme.menu.colours());
        menu_pane.add_box();
        let mut status_pane =
            DialoguePane::new(PaneSizer::Fixed(status_area), theme.help.colours());
        status_pane.add_box();

        let mut root = Self {
            navigator: MenuNavigator::new("Customize System"),
            menu_pane,
            status_pane,
            status: Rc::new(RefCell::new(None)),
            shown: None,
            actions,
            menu_height,
        };
        root.build_menus(host)?;
        root.navigator.reset()?;
        root.update_fields(host)?;
        Ok(root)
    }

    pub fn navigator(&self) -> &MenuNavigator {
        &self.navigator
    }

    pub fn menu_pane(&self) -> &DialoguePane {
        &self.menu_pane
    }

    pub fn status_pane(&self) -> &DialoguePane {
        &self.status_pane
    }

    fn choice(&self, name: &str, page: StatusPage) -> ChoiceDef {
        let slot = Rc::clone(&self.status);
        ChoiceDef::new(name)
            .handle(page.handle())
            .on_preview(move |handle| *slot.borrow_mut() = handle.cloned())
    }

    fn committing(&self, name: &str, page: StatusPage, action: Action) -> ChoiceDef {
        let queue = Rc::clone(&self.actions);
        self.choice(name, page)
            .on_commit(move |_| queue.borrow_mut().push_back(action.clone()))
    }

    fn build_menus(&mut self, host: &HostStatus) -> Result<()> {
        self.navigator
            .create_menu_if_not_present(NETWORK_MENU, Some("Network"), Some(ROOT_MENU));
        self.navigator
            .create_menu_if_not_present(VM_MENU, Some("Virtual Machines"), Some(ROOT_MENU));

        let root_choices = [
            self.choice("Status Display", StatusPage::Overview),
            self.committing(
                "Network and Management Interface",
                StatusPage::Network,
                Action::ShowMenu(NETWORK_MENU.to_string()),
            ),
            self.committing(
                "Virtual Machines",
                StatusPage::VirtualMachines,
                Action::ShowMenu(VM_MENU.to_string()),
            ),
            self.committing(
                "Hostname",
                StatusPage::Hostname,
                Action::Open(DialogueKind::ChangeHostname),
            ),
            self.committing(
                "Authentication",
                StatusPage::Password,
                Action::Open(DialogueKind::ChangePassword),
            ),
        ];
        for choice in root_choices {
            self.navigator.add_choice(ROOT_MENU, choice, None)?;
        }
        // Always last, whatever else gets added later.
        let quit = self.committing("Quit", StatusPage::Quit, Action::Quit);
        self.navigator.add_choice(ROOT_MENU, quit, Some(i32::MAX))?;

        for (index, iface) in host.interfaces.iter().enumerate() {
            let choice = self.choice(&iface.name, StatusPage::Interface(index));
            self.navigator.add_choice(NETWORK_MENU, choice, None)?;
        }
        self.populate_vm_menu(host)
    }

    /// Rebuild the VM choices from `host`, keeping the highlighted row.
    pub fn populate_vm_menu(&mut self, host: &HostStatus) -> Result<()> {
        let choices: Vec<ChoiceDef> = host
            .vms
            .iter()
            .enumerate()
            .map(|(index, vm)| {
                self.committing(
                    &vm.name,
                    StatusPage::Vm(index),
                    Action::Open(DialogueKind::RenameVm(index)),
                )
            })
            .collect();

        let menu = self.navigator.menu_mut(VM_MENU)?;
        let index = menu.choice_index();
        menu.remove_choices();
        for choice in choices {
            menu.add_choice_def(choice, None);
        }
        menu.set_current_choice(index);
        Ok(())
    }

    /// Show another menu, e.g. after a choice committed into a submenu.
    pub fn show_menu(&mut self, key: &str, host: &HostStatus) -> Result<()> {
        self.navigator.change_menu(key)?;
        self.update_fields(host)
    }

    /// Refill both panes from the current menu and the previewed choice.
    pub fn update_fields(&mut self, host: &HostStatus) -> Result<()> {
        let rows = self.menu_pane.area().height.saturating_sub(MENU_PANE_CHROME);
        let menu_height = self.menu_height.min(usize::from(rows));
        let menu = self.navigator.current_menu()?;

        self.menu_pane.reset_fields();
        self.menu_pane.add_title_field(menu.title());
        self.menu_pane.add_menu_field(menu, Some(menu_height));
        let mut help = vec![("<Up/Down>", "Select")];
        if menu.parent().is_some() {
            help.push(("<Esc/Left>", "Back"));
        } else if menu
            .choices()
            .get(menu.choice_index())
            .is_some_and(ChoiceDef::has_commit)
        {
            help.push(("<Enter>", "OK"));
        }
        self.menu_pane.add_key_help_field(help);

        self.update_status(host)
    }

    fn update_status(&mut self, host: &HostStatus) -> Result<()> {
        let handle = self.status.borrow().clone();
        if handle != self.shown {
            self.status_pane.reset_scroll();
            self.shown = handle.clone();
        }
        self.status_pane.reset_fields();
        let filled = handle
            .as_deref()
            .map(StatusPage::from_handle)
            .transpose()
            .and_then(|page| match page {
                Some(page) => page.fill(&mut self.status_pane, host),
                None => Ok(()),
            });
        if let Err(err) = filled {
            warn!(?handle, "status page failed: {err:#}");
            self.status_pane.reset_fields();
            self.status_pane.add_title_field("Information not available");
        }

        if self.status_pane.needs_scroll()? {
            self.status_pane
                .add_key_help_field([("<Page Up/Down>", "Scroll"), ("<F5>", "Refresh")]);
        }
        Ok(())
    }

    /// Route a key to the menus, then to status scrolling. Panes are rebuilt
    /// after anything handled.
    pub fn handle_key(&mut self, key: Key, host: &HostStatus) -> Result<bool> {
        let handled = if self.navigator.handle_key(key)? {
            true
        } else {
            match key {
                Key::PageUp => {
                    self.status_pane.scroll_page_up()?;
                    true
                }
                Key::PageDown => {
                    self.status_pane.scroll_page_down()?;
                    true
                }
                _ => false,
            }
        };
        if handled {
            debug!(?key, menu = self.navigator.current_key(), "root key handled");
            self.update_fields(host)?;
        }
        Ok(handled)
    }

    pub fn resize(&mut self, area: Rect, host: &HostStatus) -> Result<()> {
        let (menu_area, status_area) = split_area(area);
        self.menu_pane.set_sizer(PaneSizer::Fixed(menu_area));
        self.status_pane.set_sizer(PaneSizer::Fixed(status_area));
        self.update_fields(host)
    }

    pub fn render(&mut self) -> Result<()> {
        self.menu_pane.render()?;
        self.status_pane.render()
    }
}
