use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use crate::key::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(Key),
    /// Ctrl-C or Ctrl-Q, whatever dialogue is open.
    Quit,
    Tick,
    Resize(u16, u16),
}

impl AppEvent {
    /// Map a terminal event onto what the dashboard understands. Key releases
    /// and keys without a [`Key`] counterpart are dropped here.
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::from_key_event(key),
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }

    fn from_key_event(event: KeyEvent) -> Option<Self> {
        if event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            return Some(AppEvent::Quit);
        }
        match Key::try_from(event) {
            Ok(key) => Some(AppEvent::Key(key)),
            Err(event) => {
                trace!(?event, "dropping key event");
                None
            }
        }
    }
}

/// Reads terminal events on a background thread. The UI thread consumes them
/// one at a time, so a key is fully handled before the next is looked at.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let next = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(event) => AppEvent::from_terminal(event),
                        Err(_) => None,
                    }
                } else {
                    Some(AppEvent::Tick)
                };
                let Some(app_event) = next else {
                    continue;
                };
                if tx.send(app_event).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        for ch in ['c', 'q'] {
            let event = press(KeyCode::Char(ch), KeyModifiers::CONTROL);
            assert_eq!(AppEvent::from_terminal(event), Some(AppEvent::Quit));
        }
        let event = press(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(
            AppEvent::from_terminal(event),
            Some(AppEvent::Key(Key::Char('q')))
        );
    }

    #[test]
    fn releases_and_unmapped_keys_are_dropped() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(AppEvent::from_terminal(release), None);
        let alt = press(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(AppEvent::from_terminal(alt), None);
        assert_eq!(AppEvent::from_terminal(Event::FocusGained), None);
    }

    #[test]
    fn resize_passes_through() {
        assert_eq!(
            AppEvent::from_terminal(Event::Resize(100, 30)),
            Some(AppEvent::Resize(100, 30))
        );
    }
}
