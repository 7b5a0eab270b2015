/// The terminal seam: everything the engine needs from a character display.
///
/// Coordinates are zero-based (column, row). Backends translate to whatever
/// addressing the device uses. Output from `draw_str` may sit in a buffer
/// until `flush`; `draw_char` is visible immediately.

use std::io;

use crossterm::event::KeyEvent;

pub trait Terminal {
    /// Raw input, hidden cursor, cleared display. Idempotent.
    fn initialize(&mut self) -> io::Result<()>;

    /// Undo `initialize`. No-op when not initialized.
    fn shutdown(&mut self) -> io::Result<()>;

    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()>;

    fn draw_char(&mut self, x: u16, y: u16, glyph: char) -> io::Result<()>;

    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Next pending key press, never blocking. Release events are dropped.
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>>;
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn initialize(&mut self) -> io::Result<()> { (**self).initialize() }
    fn shutdown(&mut self) -> io::Result<()> { (**self).shutdown() }
    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> { (**self).move_cursor(x, y) }
    fn draw_char(&mut self, x: u16, y: u16, glyph: char) -> io::Result<()> { (**self).draw_char(x, y, glyph) }
    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> { (**self).draw_str(x, y, text) }
    fn flush(&mut self) -> io::Result<()> { (**self).flush() }
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> { (**self).poll_key() }
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn initialize(&mut self) -> io::Result<()> { (**self).initialize() }
    fn shutdown(&mut self) -> io::Result<()> { (**self).shutdown() }
    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> { (**self).move_cursor(x, y) }
    fn draw_char(&mut self, x: u16, y: u16, glyph: char) -> io::Result<()> { (**self).draw_char(x, y, glyph) }
    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> { (**self).draw_str(x, y, text) }
    fn flush(&mut self) -> io::Result<()> { (**self).flush() }
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> { (**self).poll_key() }
}

/// An initialized terminal that is restored when the session ends, however
/// it ends: `close()`, an early `?` return, or a panic unwinding through.
pub struct TerminalSession<T: Terminal> {
    term: T,
    open: bool,
}

impl<T: Terminal> TerminalSession<T> {
    pub fn open(mut term: T) -> io::Result<Self> {
        if let Err(e) = term.initialize() {
            // Partial setup (raw mode without the screen switch, say) still needs undoing.
            let _ = term.shutdown();
            return Err(e);
        }
        Ok(TerminalSession { term, open: true })
    }

    pub fn terminal(&mut self) -> &mut T {
        &mut self.term
    }

    /// Restore now and report failures. Drop does the same silently.
    pub fn close(mut self) -> io::Result<()> {
        self.open = false;
        self.term.shutdown()
    }
}

impl<T: Terminal> Drop for TerminalSession<T> {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = self.term.shutdown() {
                log::error!("terminal restore failed: {e}");
            }
        }
    }
}
