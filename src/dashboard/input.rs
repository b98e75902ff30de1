use std::collections::BTreeMap;

use anyhow::{Context, Result, bail, ensure};
use ratatui::layout::Rect;
use tracing::debug;

use super::status::HostStatus;
use crate::fields::Flow;
use crate::key::Key;
use crate::pane::DialoguePane;
use crate::ui::PaneColours;

const HOSTNAME_MAX_LEN: usize = 63;
const PASSWORD_MIN_LEN: usize = 6;

/// Dialogues a menu choice can open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueKind {
    ChangeHostname,
    ChangePassword,
    RenameVm(usize),
}

impl DialogueKind {
    pub fn title(self) -> &'static str {
        match self {
            DialogueKind::ChangeHostname => "Change Hostname",
            DialogueKind::ChangePassword => "Change Password",
            DialogueKind::RenameVm(_) => "Rename Virtual Machine",
        }
    }

    fn build(self, pane: &mut DialoguePane, host: &HostStatus, limit: usize) -> Result<()> {
        match self {
            DialogueKind::ChangeHostname => {
                pane.add_wrapped_text_field("Enter the new name for this host.", None);
                pane.new_line();
                pane.add_input_field("Hostname", &host.hostname, "hostname", Some(limit));
            }
            DialogueKind::ChangePassword => {
                pane.add_wrapped_text_field(
                    "Enter the new console password twice to confirm it.",
                    None,
                );
                pane.new_line();
                pane.add_password_field("New password", "", "new", Some(limit));
                pane.add_password_field("Confirm", "", "confirm", Some(limit));
            }
            DialogueKind::RenameVm(index) => {
                let vm = host
                    .vms
                    .get(index)
                    .with_context(|| format!("virtual machine {index} not found"))?;
                pane.add_wrapped_text_field(&format!("Enter a new name for {}.", vm.name), None);
                pane.new_line();
                pane.add_input_field("Name", &vm.name, "name", Some(limit));
            }
        }
        Ok(())
    }

    /// Validate committed values and apply them to `host`. Returns the
    /// message to show the user.
    pub fn apply(
        self,
        values: &BTreeMap<String, String>,
        host: &mut HostStatus,
    ) -> Result<String> {
        let value = |tag: &str| {
            values
                .get(tag)
                .map(|v| v.trim().to_string())
                .with_context(|| format!("missing value `{tag}`"))
        };
        match self {
            DialogueKind::ChangeHostname => {
                let hostname = value("hostname")?;
                validate_hostname(&hostname)?;
                host.hostname = hostname;
                Ok(format!("Hostname changed to {}.", host.hostname))
            }
            DialogueKind::ChangePassword => {
                let new = value("new")?;
                ensure!(new == value("confirm")?, "The passwords do not match.");
                ensure!(
                    new.chars().count() >= PASSWORD_MIN_LEN,
                    "The password must be at least {PASSWORD_MIN_LEN} characters long."
                );
                Ok("Password changed.".to_string())
            }
            DialogueKind::RenameVm(index) => {
                let name = value("name")?;
                ensure!(!name.is_empty(), "The name must not be empty.");
                let vm = host
                    .vms
                    .get_mut(index)
                    .with_context(|| format!("virtual machine {index} not found"))?;
                let message = format!("Renamed {} to {name}.", vm.name);
                vm.name = name;
                Ok(message)
            }
        }
    }
}

fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        bail!("The hostname must not be empty.");
    }
    if hostname.len() > HOSTNAME_MAX_LEN {
        bail!("The hostname must be at most {HOSTNAME_MAX_LEN} characters long.");
    }
    if let Some(bad) = hostname
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
    {
        bail!("The hostname may not contain '{bad}'.");
    }
    if hostname.starts_with('-') || hostname.ends_with('-') {
        bail!("The hostname may not start or end with '-'.");
    }
    Ok(())
}

/// What a modal dialogue wants after seeing a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueOutcome {
    Continue,
    Close,
    Commit(DialogueKind, BTreeMap<String, String>),
}

/// A centred, boxed form of input fields.
pub struct InputDialogue {
    kind: DialogueKind,
    pane: DialoguePane,
}

impl InputDialogue {
    pub fn new(
        kind: DialogueKind,
        parent: Rect,
        colours: PaneColours,
        host: &HostStatus,
        length_limit: usize,
    ) -> Result<Self> {
        let mut pane = DialoguePane::centred(parent, colours);
        pane.set_title(kind.title());
        pane.add_box();
        kind.build(&mut pane, host, length_limit)?;

        let mut help = vec![("<Enter>", "OK"), ("<Esc>", "Cancel")];
        if pane.num_input_fields() > 1 {
            help.push(("<Tab>", "Next"));
        }
        pane.add_key_help_field(help);
        pane.set_input_index(Some(0));
        Ok(Self { kind, pane })
    }

    pub fn kind(&self) -> DialogueKind {
        self.kind
    }

    pub fn pane(&self) -> &DialoguePane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut DialoguePane {
        &mut self.pane
    }

    pub fn handle_key(&mut self, key: Key) -> DialogueOutcome {
        match key {
            Key::Escape => DialogueOutcome::Close,
            Key::Tab | Key::Down => {
                self.pane.activate_next_input();
                DialogueOutcome::Continue
            }
            Key::BackTab | Key::Up => {
                self.pane.activate_previous_input();
                DialogueOutcome::Continue
            }
            Key::Enter if self.pane.is_last_input() => {
                debug!(kind = ?self.kind, "dialogue committed");
                DialogueOutcome::Commit(self.kind, self.pane.field_values())
            }
            Key::Enter => {
                self.pane.activate_next_input();
                DialogueOutcome::Continue
            }
            other => {
                self.pane.handle_input_key(other);
                DialogueOutcome::Continue
            }
        }
    }
}

/// A centred message box dismissed with Enter or Escape.
pub struct InfoDialogue {
    pane: DialoguePane,
}

impl InfoDialogue {
    pub fn new(parent: Rect, colours: PaneColours, title: &str, text: &str, warning: bool) -> Self {
        let mut pane = DialoguePane::centred(parent, colours);
        pane.set_title(title);
        pane.add_box();
        if warning {
            pane.add_warning_field(text);
        } else {
            pane.add_wrapped_centred_text_field(text, Some(Flow::Return));
        }
        pane.add_key_help_field([("<Enter>", "OK")]);
        Self { pane }
    }

    pub fn pane(&self) -> &DialoguePane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut DialoguePane {
        &mut self.pane
    }

    pub fn handle_key(&mut self, key: Key) -> DialogueOutcome {
        match key {
            Key::Enter | Key::Escape => DialogueOutcome::Close,
            _ => DialogueOutcome::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialogue(kind: DialogueKind) -> InputDialogue {
        InputDialogue::new(
            kind,
            Rect::new(0, 0, 80, 24),
            PaneColours::default(),
            &HostStatus::demo(),
            255,
        )
        .unwrap()
    }

    fn type_text(dialogue: &mut InputDialogue, text: &str) {
        for ch in text.chars() {
            assert_eq!(dialogue.handle_key(Key::Char(ch)), DialogueOutcome::Continue);
        }
    }

    #[test]
    fn enter_moves_focus_until_last_input() {
        let mut dialogue = dialogue(DialogueKind::ChangePassword);
        assert_eq!(dialogue.pane().input_index(), Some(0));
        type_text(&mut dialogue, "secret1");
        assert_eq!(dialogue.handle_key(Key::Enter), DialogueOutcome::Continue);
        assert_eq!(dialogue.pane().input_index(), Some(1));
        type_text(&mut dialogue, "secret1");

        let DialogueOutcome::Commit(kind, values) = dialogue.handle_key(Key::Enter) else {
            panic!("expected commit");
        };
        assert_eq!(kind, DialogueKind::ChangePassword);
        assert_eq!(values["new"], "secret1");
        assert_eq!(values["confirm"], "secret1");
    }

    #[test]
    fn typing_replaces_preselected_value() {
        let mut dialogue = dialogue(DialogueKind::ChangeHostname);
        type_text(&mut dialogue, "edge-02");
        let DialogueOutcome::Commit(_, values) = dialogue.handle_key(Key::Enter) else {
            panic!("expected commit");
        };
        assert_eq!(values["hostname"], "edge-02");
    }

    #[test]
    fn stray_keys_keep_preselected_value() {
        let mut dialogue = dialogue(DialogueKind::ChangeHostname);
        for key in [Key::PageDown, Key::F(5), Key::PageUp] {
            assert_eq!(dialogue.handle_key(key), DialogueOutcome::Continue);
        }
        let DialogueOutcome::Commit(_, values) = dialogue.handle_key(Key::Enter) else {
            panic!("expected commit");
        };
        assert_eq!(values["hostname"], "virt-host-01");
    }

    #[test]
    fn back_tab_wraps_to_last_input() {
        let mut dialogue = dialogue(DialogueKind::ChangePassword);
        dialogue.handle_key(Key::BackTab);
        assert_eq!(dialogue.pane().input_index(), Some(1));
        dialogue.handle_key(Key::Tab);
        assert_eq!(dialogue.pane().input_index(), Some(0));
    }

    #[test]
    fn escape_closes() {
        let mut dialogue = dialogue(DialogueKind::ChangeHostname);
        assert_eq!(dialogue.handle_key(Key::Escape), DialogueOutcome::Close);
    }

    #[test]
    fn unknown_vm_cannot_open() {
        let result = InputDialogue::new(
            DialogueKind::RenameVm(42),
            Rect::new(0, 0, 80, 24),
            PaneColours::default(),
            &HostStatus::demo(),
            255,
        );
        assert!(result.is_err());
    }

    #[test]
    fn hostname_validation() {
        assert!(validate_hostname("web-01").is_ok());
        assert!(validate_hostname("").is_err());
        assert!(validate_hostname("bad name").is_err());
        assert!(validate_hostname("-edge").is_err());
        assert!(validate_hostname(&"a".repeat(64)).is_err());
    }

    #[test]
    fn apply_password_requires_match() {
        let mut host = HostStatus::demo();
        let values: BTreeMap<String, String> = [("new", "secret1"), ("confirm", "secret2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let err = DialogueKind::ChangePassword
            .apply(&values, &mut host)
            .unwrap_err();
        assert_eq!(err.to_string(), "The passwords do not match.");
    }

    #[test]
    fn apply_rename_updates_host() {
        let mut host = HostStatus::demo();
        let values = BTreeMap::from([("name".to_string(), " ci-runner ".to_string())]);
        let message = DialogueKind::RenameVm(0).apply(&values, &mut host).unwrap();
        assert_eq!(message, "Renamed build-runner to ci-runner.");
        assert_eq!(host.vms[0].name, "ci-runner");
    }

    #[test]
    fn info_closes_on_enter_only() {
        let mut info = InfoDialogue::new(
            Rect::new(0, 0, 80, 24),
            PaneColours::default(),
            "Done",
            "Hostname changed.",
            false,
        );
        assert_eq!(info.handle_key(Key::Char('x')), DialogueOutcome::Continue);
        assert_eq!(info.handle_key(Key::Enter), DialogueOutcome::Close);
    }
}
