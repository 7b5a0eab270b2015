/// Terminal backends, picked at startup from config or `--backend`.

mod ansi;
mod native;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use serde::Deserialize;

use super::terminal::Terminal;

pub use ansi::AnsiTerminal;
pub use native::CrosstermTerminal;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// crossterm commands, alternate screen.
    #[default]
    Native,
    /// Raw ANSI escape sequences on stdout.
    Ansi,
}

pub fn open(kind: BackendKind) -> Box<dyn Terminal> {
    match kind {
        BackendKind::Native => Box::new(CrosstermTerminal::new()),
        BackendKind::Ansi => Box::new(AnsiTerminal::stdout()),
    }
}

/// Drain pending terminal events until a key press turns up. Never blocks;
/// keys behind the returned one stay queued for the next tick.
fn poll_crossterm_key() -> io::Result<Option<KeyEvent>> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}
