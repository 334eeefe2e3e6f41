//! TUI Event System
//!
//! Handles user input and terminal events for the wizard interface.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// User pressed a key
    Key(KeyEvent),

    /// User pasted text (also how most terminals deliver a dropped file path)
    Paste(String),

    /// Terminal was resized
    Resize(u16, u16),

    /// Redraw tick
    Tick,

    /// Request to quit
    Quit,
}

/// Event handler for the TUI
pub struct EventHandler {
    /// Event sender
    tx: mpsc::UnboundedSender<TuiEvent>,

    /// Event receiver
    rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Get a sender for sending events
    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available)
    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }

    /// Start listening for terminal events
    ///
    /// Uses crossterm's async EventStream so a slow backend request never
    /// starves input handling.
    pub fn start_terminal_listener(tx: mpsc::UnboundedSender<TuiEvent>, tick_rate: Duration) {
        use crossterm::event::EventStream;
        use futures::StreamExt;

        tokio::spawn(async move {
            let mut reader = EventStream::new();

            loop {
                // Race: next terminal event vs tick timer
                let event = tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(event)) => Some(event),
                            Some(Err(e)) => {
                                tracing::warn!("Terminal event error: {}", e);
                                None
                            }
                            None => break, // Stream closed
                        }
                    }
                    _ = tokio::time::sleep(tick_rate) => None,
                };

                if let Some(event) = event {
                    let should_break = match event {
                        crossterm::event::Event::Key(key) => {
                            // Only process key press events to avoid duplicates
                            if key.kind == crossterm::event::KeyEventKind::Press {
                                tx.send(TuiEvent::Key(key)).is_err()
                            } else {
                                false
                            }
                        }
                        crossterm::event::Event::Resize(w, h) => {
                            tx.send(TuiEvent::Resize(w, h)).is_err()
                        }
                        crossterm::event::Event::Paste(text) => {
                            tx.send(TuiEvent::Paste(text)).is_err()
                        }
                        _ => false,
                    };
                    if should_break {
                        break;
                    }
                }

                if tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to check if a key event matches
pub fn key_matches(event: &KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    event.code == code && event.modifiers == modifiers
}

/// Common key bindings
pub mod keys {
    use super::*;

    /// Ctrl+C - Quit
    pub fn is_quit(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    /// F2 or Ctrl+T - Switch between advisor and GPA calculator
    pub fn is_switch_tab(event: &KeyEvent) -> bool {
        event.code == KeyCode::F(2) || key_matches(event, KeyCode::Char('t'), KeyModifiers::CONTROL)
    }

    /// Ctrl+R - Start over
    pub fn is_restart(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('r'), KeyModifiers::CONTROL)
    }

    /// Ctrl+N - Add grade row
    pub fn is_add_row(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('n'), KeyModifiers::CONTROL)
    }

    /// Ctrl+D - Remove grade row
    pub fn is_remove_row(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('d'), KeyModifiers::CONTROL)
    }

    /// Escape - Cancel/Back
    pub fn is_cancel(event: &KeyEvent) -> bool {
        event.code == KeyCode::Esc
    }

    /// Enter - Select/Confirm
    pub fn is_enter(event: &KeyEvent) -> bool {
        event.code == KeyCode::Enter && event.modifiers.is_empty()
    }

    /// Tab - Next field
    pub fn is_next_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::Tab
    }

    /// Shift+Tab - Previous field
    pub fn is_prev_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::BackTab
    }

    /// Up arrow
    pub fn is_up(event: &KeyEvent) -> bool {
        event.code == KeyCode::Up && event.modifiers.is_empty()
    }

    /// Down arrow
    pub fn is_down(event: &KeyEvent) -> bool {
        event.code == KeyCode::Down && event.modifiers.is_empty()
    }

    /// Left arrow
    pub fn is_left(event: &KeyEvent) -> bool {
        event.code == KeyCode::Left && event.modifiers.is_empty()
    }

    /// Right arrow
    pub fn is_right(event: &KeyEvent) -> bool {
        event.code == KeyCode::Right && event.modifiers.is_empty()
    }

    /// Backspace
    pub fn is_backspace(event: &KeyEvent) -> bool {
        event.code == KeyCode::Backspace
    }

    /// Printable character without Ctrl/Alt
    pub fn typed_char(event: &KeyEvent) -> Option<char> {
        match event.code {
            KeyCode::Char(c)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}
