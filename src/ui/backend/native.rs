/// Native console backend: crossterm commands on a buffered stdout.
/// Runs in the alternate screen so the shell's scrollback survives the game.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::KeyEvent,
    execute, queue,
    style::{Print, ResetColor},
    terminal::{self, Clear, ClearType},
};

use crate::ui::terminal::Terminal;

pub struct CrosstermTerminal {
    writer: BufWriter<Stdout>,
    active: bool,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        CrosstermTerminal {
            writer: BufWriter::with_capacity(64 * 1024, io::stdout()),
            active: false,
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn initialize(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    fn shutdown(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        // Raw mode goes back even if the screen commands failed.
        let raw = terminal::disable_raw_mode();
        screen.and(raw)
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        queue!(self.writer, MoveTo(x, y))
    }

    fn draw_char(&mut self, x: u16, y: u16, glyph: char) -> io::Result<()> {
        execute!(self.writer, MoveTo(x, y), Print(glyph))
    }

    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> {
        queue!(self.writer, MoveTo(x, y), Print(text))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        super::poll_crossterm_key()
    }
}
