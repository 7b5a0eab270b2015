/// ANSI backend: VT100 escape sequences written straight to any `io::Write`.
///
/// On a real TTY raw mode and key input still come from crossterm; over any
/// other writer (a file, a pipe, a test buffer) the backend is output-only and
/// `poll_key` never yields a key.

use std::io::{self, BufWriter, IsTerminal, Stdout, Write};

use crossterm::event::KeyEvent;
use crossterm::terminal;

use crate::ui::terminal::Terminal;

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_HOME: &str = "\x1b[2J\x1b[H";

pub struct AnsiTerminal<W: Write> {
    out: W,
    tty: bool,
    active: bool,
}

impl<W: Write> AnsiTerminal<W> {
    pub fn new(out: W) -> Self {
        AnsiTerminal { out, tty: false, active: false }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl AnsiTerminal<BufWriter<Stdout>> {
    /// Raw mode and key input only when stdout really is a terminal.
    pub fn stdout() -> Self {
        AnsiTerminal {
            tty: io::stdout().is_terminal(),
            ..AnsiTerminal::new(BufWriter::with_capacity(64 * 1024, io::stdout()))
        }
    }
}

impl<W: Write> Terminal for AnsiTerminal<W> {
    fn initialize(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        self.active = true;
        if self.tty {
            terminal::enable_raw_mode()?;
        }
        write!(self.out, "{HIDE_CURSOR}{CLEAR_HOME}")?;
        self.out.flush()
    }

    fn shutdown(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = write!(self.out, "{SHOW_CURSOR}{CLEAR_HOME}").and_then(|_| self.out.flush());
        let raw = if self.tty { terminal::disable_raw_mode() } else { Ok(()) };
        screen.and(raw)
    }

    /// Zero-based in, one-based on the wire.
    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        write!(self.out, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
    }

    fn draw_char(&mut self, x: u16, y: u16, glyph: char) -> io::Result<()> {
        self.move_cursor(x, y)?;
        write!(self.out, "{glyph}")?;
        self.out.flush()
    }

    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> {
        self.move_cursor(x, y)?;
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        if self.tty {
            super::poll_crossterm_key()
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(term: AnsiTerminal<Vec<u8>>) -> String {
        String::from_utf8(term.into_inner()).unwrap()
    }

    #[test]
    fn initialize_hides_cursor_and_clears() {
        let mut term = AnsiTerminal::new(Vec::new());
        term.initialize().unwrap();
        term.initialize().unwrap();
        assert_eq!(output(term), "\x1b[?25l\x1b[2J\x1b[H");
    }

    #[test]
    fn cursor_addressing_is_one_based_row_first() {
        let mut term = AnsiTerminal::new(Vec::new());
        term.move_cursor(0, 0).unwrap();
        term.draw_char(4, 2, '@').unwrap();
        assert_eq!(output(term), "\x1b[1;1H\x1b[3;5H@");
    }

    #[test]
    fn draw_str_writes_the_run_after_one_move() {
        let mut term = AnsiTerminal::new(Vec::new());
        term.draw_str(0, 39, "# ~~ #").unwrap();
        term.flush().unwrap();
        assert_eq!(output(term), "\x1b[40;1H# ~~ #");
    }

    #[test]
    fn shutdown_shows_cursor_once() {
        let mut term = AnsiTerminal::new(Vec::new());
        term.shutdown().unwrap();
        term.initialize().unwrap();
        term.shutdown().unwrap();
        term.shutdown().unwrap();
        assert_eq!(output(term), "\x1b[?25l\x1b[2J\x1b[H\x1b[?25h\x1b[2J\x1b[H");
    }

    #[test]
    fn stdout_only_claims_a_tty_when_it_is_one() {
        let term = AnsiTerminal::stdout();
        assert_eq!(term.tty, io::stdout().is_terminal());
        assert!(!AnsiTerminal::new(Vec::new()).tty);
    }

    #[test]
    fn plain_writer_has_no_input() {
        let mut term = AnsiTerminal::new(io::sink());
        assert!(term.poll_key().unwrap().is_none());
    }
}
