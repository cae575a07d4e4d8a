use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers, MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                match reader.next().await {
                    Some(Ok(CrosstermEvent::Key(key))) => {
                        if event_tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => {
                        if event_tx.send(Event::Mouse(mouse)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(CrosstermEvent::Resize(_, _))) => {
                        if event_tx.send(Event::Resize).is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::error!("terminal event stream failed: {e}");
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// All context needed to map a key event to an action.
pub struct KeyContext {
    pub hints_open: bool,
}

/// Map a key event to an action based on current app context.
pub fn map_key_to_action(key: KeyEvent, ctx: &KeyContext) -> Option<Action> {
    // Ctrl-C / Ctrl-D always quit
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(Action::Quit),
            KeyCode::Char('f') => Some(Action::ScrollPageDown),
            KeyCode::Char('b') => Some(Action::ScrollPageUp),
            _ => None,
        };
    }

    // The hint overlay swallows everything except its own close keys
    if ctx.hints_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHints),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::ScrollLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::ScrollRight),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::ScrollPageDown),
        KeyCode::PageUp => Some(Action::ScrollPageUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::ScrollTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::ScrollBottom),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchFocus),
        KeyCode::Char('n') | KeyCode::Char(']') => Some(Action::NextHunk),
        KeyCode::Char('p') | KeyCode::Char('[') => Some(Action::PrevHunk),
        KeyCode::Char('R') => Some(Action::Reload),
        KeyCode::Char('y') => Some(Action::CopyHunk),
        KeyCode::Char('Y') => Some(Action::CopyDocument),
        KeyCode::Char('t') => Some(Action::NextTheme),
        KeyCode::Char('T') => Some(Action::PrevTheme),
        KeyCode::Char('c') => Some(Action::ToggleConnectors),
        KeyCode::Char('?') => Some(Action::ToggleHints),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    const NORMAL: KeyContext = KeyContext { hints_open: false };

    #[test]
    fn test_hunk_keys() {
        assert_eq!(map_key_to_action(key(KeyCode::Char('n')), &NORMAL), Some(Action::NextHunk));
        assert_eq!(map_key_to_action(key(KeyCode::Char(']')), &NORMAL), Some(Action::NextHunk));
        assert_eq!(map_key_to_action(key(KeyCode::Char('[')), &NORMAL), Some(Action::PrevHunk));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key_to_action(ctrl_c, &NORMAL), Some(Action::Quit));
        let hints = KeyContext { hints_open: true };
        assert_eq!(map_key_to_action(ctrl_c, &hints), Some(Action::Quit));
    }

    #[test]
    fn test_hint_overlay_swallows_keys() {
        let hints = KeyContext { hints_open: true };
        assert_eq!(map_key_to_action(key(KeyCode::Char('j')), &hints), None);
        assert_eq!(map_key_to_action(key(KeyCode::Esc), &hints), Some(Action::ToggleHints));
    }

    #[test]
    fn test_plain_c_toggles_connectors() {
        assert_eq!(
            map_key_to_action(key(KeyCode::Char('c')), &NORMAL),
            Some(Action::ToggleConnectors)
        );
    }
}
