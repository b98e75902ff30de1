//! The host console screen: a root menu/status dialogue with modal
//! dialogues layered on top.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::key::Key;
use crate::menu::MenuKey;
use crate::pane::{DialoguePane, PaneSizer};
use crate::ui::{Snapshot, Theme};

pub mod input;
pub mod root;
pub mod status;

pub use input::{DialogueKind, DialogueOutcome, InfoDialogue, InputDialogue};
pub use root::RootDialogue;
pub use status::{HostStatus, StatusPage};

/// Requests raised by menu callbacks, drained after each key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ShowMenu(MenuKey),
    Open(DialogueKind),
    Quit,
}

pub type ActionQueue = Rc<RefCell<VecDeque<Action>>>;

#[derive(Clone, Copy, Debug)]
pub struct DashboardOptions {
    pub menu_height: usize,
    pub input_length_limit: usize,
}

impl From<&Config> for DashboardOptions {
    fn from(config: &Config) -> Self {
        Self {
            menu_height: config.menu_height,
            input_length_limit: config.input_length_limit,
        }
    }
}

/// A modal dialogue stacked above the root. Only the top one sees keys.
pub enum Layer {
    Input(InputDialogue),
    Info(InfoDialogue),
}

impl Layer {
    pub fn pane(&self) -> &DialoguePane {
        match self {
            Layer::Input(dialogue) => dialogue.pane(),
            Layer::Info(dialogue) => dialogue.pane(),
        }
    }

    fn pane_mut(&mut self) -> &mut DialoguePane {
        match self {
            Layer::Input(dialogue) => dialogue.pane_mut(),
            Layer::Info(dialogue) => dialogue.pane_mut(),
        }
    }

    fn handle_key(&mut self, key: Key) -> DialogueOutcome {
        match self {
            Layer::Input(dialogue) => dialogue.handle_key(key),
            Layer::Info(dialogue) => dialogue.handle_key(key),
        }
    }
}

pub struct Dashboard {
    area: Rect,
    theme: Theme,
    host: HostStatus,
    root: RootDialogue,
    layers: Vec<Layer>,
    actions: ActionQueue,
    options: DashboardOptions,
    should_quit: bool,
}

impl Dashboard {
    pub fn new(
        area: Rect,
        theme: Theme,
        host: HostStatus,
        options: DashboardOptions,
    ) -> Result<Self> {
        let actions: ActionQueue = Rc::new(RefCell::new(VecDeque::new()));
        let root = RootDialogue::new(
            area,
            &theme,
            &host,
            Rc::clone(&actions),
            options.menu_height,
        )?;
        Ok(Self {
            area,
            theme,
            host,
            root,
            layers: Vec::new(),
            actions,
            options,
            should_quit: false,
        })
    }

    pub fn host(&self) -> &HostStatus {
        &self.host
    }

    pub fn root(&self) -> &RootDialogue {
        &self.root
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn handle_key(&mut self, key: Key) -> Result<()> {
        if let Some(layer) = self.layers.last_mut() {
            match layer.handle_key(key) {
                DialogueOutcome::Continue => {}
                DialogueOutcome::Close => {
                    self.layers.pop();
                }
                DialogueOutcome::Commit(kind, values) => {
                    self.layers.pop();
                    self.apply(kind, &values)?;
                }
            }
        } else if !self.root.handle_key(key, &self.host)? {
            match key {
                Key::Escape => {
                    info!("escape at root menu, quitting");
                    self.should_quit = true;
                }
                Key::F(5) => self.root.update_fields(&self.host)?,
                _ => debug!(?key, "key ignored"),
            }
        }
        self.drain_actions()
    }

    fn drain_actions(&mut self) -> Result<()> {
        loop {
            let action = self.actions.borrow_mut().pop_front();
            let Some(action) = action else {
                return Ok(());
            };
            debug!(?action, "dashboard action");
            match action {
                Action::ShowMenu(key) => self.root.show_menu(&key, &self.host)?,
                Action::Open(kind) => self.open(kind),
                Action::Quit => self.should_quit = true,
            }
        }
    }

    /// Push an input dialogue, or an error box if it cannot be built.
    pub fn open(&mut self, kind: DialogueKind) {
        let colours = self.theme.modal.colours();
        let limit = self.options.input_length_limit;
        match InputDialogue::new(kind, self.area, colours, &self.host, limit) {
            Ok(dialogue) => self.layers.push(Layer::Input(dialogue)),
            Err(err) => {
                warn!(?kind, "cannot open dialogue: {err:#}");
                self.push_info(kind.title(), "Information not available", true);
            }
        }
    }

    fn apply(&mut self, kind: DialogueKind, values: &BTreeMap<String, String>) -> Result<()> {
        match kind.apply(values, &mut self.host) {
            Ok(message) => {
                info!(?kind, "{message}");
                if let DialogueKind::RenameVm(_) = kind {
                    self.root.populate_vm_menu(&self.host)?;
                }
                self.root.update_fields(&self.host)?;
                self.push_info(kind.title(), &message, false);
            }
            Err(err) => {
                warn!(?kind, "dialogue rejected: {err:#}");
                self.push_info(kind.title(), &format!("{err:#}"), true);
            }
        }
        Ok(())
    }

    fn push_info(&mut self, title: &str, text: &str, warning: bool) {
        let dialogue = InfoDialogue::new(
            self.area,
            self.theme.modal.colours(),
            title,
            text,
            warning,
        );
        self.layers.push(Layer::Info(dialogue));
    }

    /// Advance host uptime. The panes are rebuilt only when the shown value changes.
    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        let before = self.host.uptime();
        self.host.uptime += elapsed;
        if self.host.uptime() != before {
            self.root.update_fields(&self.host)?;
        }
        Ok(())
    }

    pub fn resize(&mut self, area: Rect) -> Result<()> {
        debug!(?area, "dashboard resized");
        self.area = area;
        self.root.resize(area, &self.host)?;
        for layer in &mut self.layers {
            let pane = layer.pane_mut();
            pane.set_sizer(PaneSizer::centred(area));
            pane.reset_position();
        }
        Ok(())
    }

    /// Paint every pane into its own window.
    pub fn render(&mut self) -> Result<()> {
        self.root.render()?;
        for layer in &mut self.layers {
            layer.pane_mut().render()?;
        }
        Ok(())
    }

    fn panes(&self) -> impl Iterator<Item = &DialoguePane> {
        [self.root.menu_pane(), self.root.status_pane()]
            .into_iter()
            .chain(self.layers.iter().map(Layer::pane))
    }

    /// Merge the rendered windows, bottom to top, over the header and background.
    pub fn compose(&self, buf: &mut Buffer) {
        buf.set_style(self.area, self.theme.background());
        let header = self.theme.header();
        let title = format!(" {} {}", self.host.product, self.host.version);
        buf.set_string(self.area.x, self.area.y, &title, header);
        let hostname_width = u16::try_from(self.host.hostname.chars().count()).unwrap_or(0);
        let right = self.area.right().saturating_sub(hostname_width + 1);
        if right > self.area.x + u16::try_from(title.len()).unwrap_or(u16::MAX) {
            buf.set_string(right, self.area.y, &self.host.hostname, header);
        }

        for pane in self.panes() {
            let Some(window) = pane.window() else {
                continue;
            };
            if buf.area.union(window.area()) == buf.area {
                buf.merge(window.buffer());
            }
        }
    }

    /// Terminal cursor for the focused input of the top dialogue.
    pub fn cursor_position(&self) -> Option<Position> {
        let pane = self.layers.last()?.pane();
        if pane.needs_cursor() {
            pane.cursor_position()
        } else {
            None
        }
    }

    /// Render and compose off-screen.
    pub fn snapshot(&mut self) -> Result<Snapshot> {
        self.render()?;
        let mut buf = Buffer::empty(self.area);
        self.compose(&mut buf);
        Ok(Snapshot::of(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            Rect::new(0, 0, 80, 24),
            Theme::default(),
            HostStatus::demo(),
            DashboardOptions {
                menu_height: 16,
                input_length_limit: 255,
            },
        )
        .unwrap()
    }

    fn press(dashboard: &mut Dashboard, keys: &[Key]) {
        for key in keys {
            dashboard.handle_key(*key).unwrap();
        }
    }

    #[test]
    fn root_panes_split_the_screen() {
        let dash = dashboard();
        assert_eq!(dash.root().menu_pane().area(), Rect::new(1, 2, 39, 21));
        assert_eq!(dash.root().status_pane().area(), Rect::new(40, 2, 39, 21));
    }

    #[test]
    fn snapshot_shows_header_menu_and_status() {
        let mut dash = dashboard();
        let snap = dash.snapshot().unwrap();
        assert!(snap.row(0).starts_with(" Host Console"));
        assert!(snap.row(0).ends_with("virt-host-01"));
        assert!(snap.contains("Customize System"));
        assert!(snap.contains("Status Display"));
        assert!(snap.contains("virt-host-01"));
        assert!(snap.contains("<Up/Down> Select"));
    }

    #[test]
    fn submenu_and_back() {
        let mut dash = dashboard();
        press(&mut dash, &[Key::Down, Key::Enter]);
        assert_eq!(dash.root().navigator().current_key(), root::NETWORK_MENU);
        let snap = dash.snapshot().unwrap();
        assert!(snap.contains("eth0"));
        assert!(snap.contains("<Esc/Left> Back"));

        press(&mut dash, &[Key::Escape]);
        assert_eq!(dash.root().navigator().current_key(), crate::menu::ROOT_MENU);
        assert!(!dash.should_quit());
        press(&mut dash, &[Key::Escape]);
        assert!(dash.should_quit());
    }

    #[test]
    fn changing_page_resets_status_scroll() {
        let mut dash = Dashboard::new(
            Rect::new(0, 0, 80, 12),
            Theme::default(),
            HostStatus::demo(),
            DashboardOptions {
                menu_height: 16,
                input_length_limit: 255,
            },
        )
        .unwrap();
        press(&mut dash, &[Key::PageDown]);
        assert!(dash.root().status_pane().scroll_offset() > 0);

        // letter jump straight to Quit
        press(&mut dash, &[Key::Char('q')]);
        assert_eq!(dash.root().status_pane().scroll_offset(), 0);
        assert!(!dash.should_quit());
    }

    #[test]
    fn hostname_dialogue_commits() {
        let mut dash = dashboard();
        press(&mut dash, &[Key::Char('h'), Key::Enter]);
        assert_eq!(dash.layers().len(), 1);
        dash.render().unwrap();
        assert!(dash.cursor_position().is_some());
        for ch in "edge-02".chars() {
            dash.handle_key(Key::Char(ch)).unwrap();
        }
        press(&mut dash, &[Key::Enter]);
        assert_eq!(dash.host().hostname, "edge-02");
        let snap = dash.snapshot().unwrap();
        assert!(snap.contains("Hostname changed to edge-02."));

        press(&mut dash, &[Key::Enter]);
        assert!(dash.layers().is_empty());
        assert!(dash.cursor_position().is_none());
    }

    #[test]
    fn rejected_value_shows_warning() {
        let mut dash = dashboard();
        press(&mut dash, &[Key::Char('h'), Key::Enter]);
        for ch in "bad name".chars() {
            dash.handle_key(Key::Char(ch)).unwrap();
        }
        press(&mut dash, &[Key::Enter]);
        assert_eq!(dash.host().hostname, "virt-host-01");
        let snap = dash.snapshot().unwrap();
        assert!(snap.contains("may not contain ' '"));
    }

    #[test]
    fn quit_choice_sets_flag() {
        let mut dash = dashboard();
        press(&mut dash, &[Key::Up, Key::Enter]);
        assert!(dash.should_quit());
    }

    #[test]
    fn rename_refreshes_vm_menu() {
        let mut dash = dashboard();
        press(&mut dash, &[Key::Char('v'), Key::Enter, Key::Down, Key::Enter]);
        for ch in "primary-db".chars() {
            dash.handle_key(Key::Char(ch)).unwrap();
        }
        press(&mut dash, &[Key::Enter, Key::Enter]);
        assert_eq!(dash.host().vms[1].name, "primary-db");
        let menu = dash.root().navigator().current_menu().unwrap();
        assert_eq!(menu.choices()[1].name(), "primary-db");
        assert_eq!(menu.choice_index(), 1);
    }

    #[test]
    fn tick_advances_uptime() {
        let mut dash = dashboard();
        for _ in 0..240 {
            dash.tick(Duration::from_millis(250)).unwrap();
        }
        assert_eq!(dash.host().uptime(), "0d 00:01");
        assert!(dash.snapshot().unwrap().contains("0d 00:01"));
    }

    #[test]
    fn resize_recentres_open_dialogue() {
        let mut dash = dashboard();
        press(&mut dash, &[Key::Char('h'), Key::Enter]);
        dash.render().unwrap();
        dash.resize(Rect::new(0, 0, 100, 30)).unwrap();
        dash.render().unwrap();
        let area = dash.layers()[0].pane().area();
        assert_eq!(area.x * 2 + area.width, 100);
        assert_eq!(dash.root().status_pane().area(), Rect::new(50, 2, 49, 27));
    }
}
