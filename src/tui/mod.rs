//! Terminal UI
//!
//! ratatui frontend over a spawned [`Controller`]. Key presses become
//! controller actions; every redraw uses the latest published snapshot.

pub mod app;
pub mod events;
pub mod render;

pub use app::{App, AppAction};
pub use events::{EventHandler, TuiEvent};

use crate::api::Backend;
use crate::config::Config;
use crate::wizard::Controller;
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;

/// Restores the terminal however the TUI exits
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
    }
}

/// Run the interactive wizard until the user quits
pub async fn run(config: &Config, backend: Arc<dyn Backend>) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let _guard = TerminalGuard;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let handle = Controller::new(backend, config.ui.clone()).spawn();
    let mut events = EventHandler::new();
    EventHandler::start_terminal_listener(events.sender(), config.ui.tick_rate());

    let mut app = App::new(handle.snapshots.borrow().clone());
    tracing::info!("TUI started against {}", config.backend.base_url);

    loop {
        app.sync(
            handle.snapshots.borrow().clone(),
            *handle.loading.borrow() > 0,
        );
        terminal.draw(|f| render::render(f, &app))?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            TuiEvent::Key(key) => match app.handle_key(key) {
                AppAction::Dispatch(action) => handle
                    .actions
                    .send(action)
                    .context("Wizard controller stopped")?,
                AppAction::Quit => break,
                AppAction::None => {}
            },
            TuiEvent::Paste(text) => {
                for action in app.handle_paste(&text) {
                    handle
                        .actions
                        .send(action)
                        .context("Wizard controller stopped")?;
                }
            }
            TuiEvent::Tick => app.tick(),
            TuiEvent::Resize(w, h) => tracing::debug!("Resized to {}x{}", w, h),
            TuiEvent::Quit => break,
        }
    }

    // an in-flight request has nobody left to report to
    handle.task.abort();
    tracing::info!("TUI exited");
    Ok(())
}
