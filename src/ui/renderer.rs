/// Presentation layer: full-frame redraw through the `Terminal` seam.
///
/// Each frame:
///   1. Restore terrain under every cell an actor left this tick
///   2. Redraw the grid row by row (one `draw_str` per row)
///   3. Draw alive NPCs, then the player last so it wins a shared cell
///   4. Status line directly below the grid, padded over the previous one
///   5. One flush
///
/// The grid is the ground truth, so drawing the same state twice produces
/// the same cells.

use std::io;

use crate::sim::event::GameEvent;
use crate::sim::world::GameState;
use crate::ui::terminal::Terminal;

pub struct Renderer {
    show_status: bool,
    /// Width of the last status line, so a shorter one can blank the tail.
    last_status_len: usize,
}

impl Renderer {
    pub fn new(show_status: bool) -> Self {
        Renderer { show_status, last_status_len: 0 }
    }

    /// Put the terrain glyph back under each vacated cell.
    pub fn erase_vacated<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        state: &GameState,
        events: &[GameEvent],
    ) -> io::Result<()> {
        for pos in events.iter().filter_map(GameEvent::vacated) {
            let glyph = state.grid.tile_at(pos).glyph();
            term.draw_char(pos.x as u16, pos.y as u16, glyph)?;
        }
        Ok(())
    }

    pub fn render<T: Terminal + ?Sized>(&mut self, term: &mut T, state: &GameState) -> io::Result<()> {
        let grid = &state.grid;
        for y in 0..grid.height() {
            term.draw_str(0, y as u16, grid.row_text(y))?;
        }

        for npc in state.npcs.alive() {
            term.draw_char(npc.pos.x as u16, npc.pos.y as u16, npc.glyph)?;
        }
        let player = &state.player;
        term.draw_char(player.pos.x as u16, player.pos.y as u16, player.glyph)?;

        if self.show_status {
            self.draw_status(term, state)?;
        }

        term.flush()
    }

    fn draw_status<T: Terminal + ?Sized>(&mut self, term: &mut T, state: &GameState) -> io::Result<()> {
        let text = status_text(state);
        let len = text.chars().count();
        let pad = self.last_status_len.saturating_sub(len);
        term.draw_str(0, state.grid.height() as u16, &format!("{text}{}", " ".repeat(pad)))?;
        self.last_status_len = len;
        Ok(())
    }
}

pub fn status_text(state: &GameState) -> String {
    let pos = state.player.pos;
    let mut text = format!(
        "Pos: ({}, {})  Level: {}  [WASD/arrows] move  [q] quit",
        pos.x, pos.y, state.level_name
    );
    if !state.message.is_empty() {
        text.push_str("  ");
        text.push_str(&state.message);
    }
    text
}
