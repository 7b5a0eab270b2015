//! Test-only helpers: an in-memory terminal and level builders.

use std::collections::{BTreeMap, VecDeque};
use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::GameConfig;
use crate::domain::entity::Pos;
use crate::domain::movement::MovePolicy;
use crate::domain::tile::{ObstacleSet, Ruleset};
use crate::sim::level::{build_state, LevelDef};
use crate::sim::world::GameState;
use crate::ui::terminal::Terminal;

// ── Terminal ──

/// A terminal that records cells instead of printing, and replays scripted keys.
#[derive(Default)]
pub struct MemoryTerminal {
    pub cells: BTreeMap<(u16, u16), char>,
    pub keys: VecDeque<KeyEvent>,
    pub init_calls: usize,
    pub shutdown_calls: usize,
    pub flushes: usize,
    pub cursor_visible: bool,
    pub fail_init: bool,
    cursor: (u16, u16),
}

impl MemoryTerminal {
    pub fn new() -> Self {
        MemoryTerminal { cursor_visible: true, ..Default::default() }
    }

    pub fn with_keys(keys: &str) -> Self {
        MemoryTerminal { keys: keys.chars().map(key).collect(), ..MemoryTerminal::new() }
    }

    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        self.cells.get(&(x, y)).copied()
    }

    /// Row `y` from column 0, unwritten cells as spaces.
    pub fn row(&self, y: u16, width: u16) -> String {
        (0..width).map(|x| self.char_at(x, y).unwrap_or(' ')).collect()
    }

    fn put(&mut self, glyph: char) {
        self.cells.insert(self.cursor, glyph);
        self.cursor.0 += 1;
    }
}

impl Terminal for MemoryTerminal {
    fn initialize(&mut self) -> io::Result<()> {
        self.init_calls += 1;
        if self.fail_init {
            return Err(io::Error::new(io::ErrorKind::Other, "no tty"));
        }
        self.cursor_visible = false;
        self.cells.clear();
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.shutdown_calls += 1;
        self.cursor_visible = true;
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.cursor = (x, y);
        Ok(())
    }

    fn draw_char(&mut self, x: u16, y: u16, glyph: char) -> io::Result<()> {
        self.move_cursor(x, y)?;
        self.put(glyph);
        Ok(())
    }

    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> {
        self.move_cursor(x, y)?;
        text.chars().for_each(|c| self.put(c));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        Ok(self.keys.pop_front())
    }
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

// ── Levels ──

pub fn open_rows(width: usize, height: usize) -> Vec<String> {
    vec![" ".repeat(width); height]
}

pub fn bordered_rows(width: usize, height: usize) -> Vec<String> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| if x == 0 || y == 0 || x == width - 1 || y == height - 1 { '#' } else { ' ' })
                .collect()
        })
        .collect()
}

/// `LevelDef` with test-friendly defaults: boundary obstacles, reject policy,
/// player at the center, no enemies, 5 ms ticks, throttle 5.
pub struct LevelBuilder {
    def: LevelDef,
}

impl LevelBuilder {
    pub fn new(rows: Vec<String>) -> Self {
        let width = rows.first().map_or(0, |r| r.chars().count());
        LevelBuilder {
            def: LevelDef {
                name: "Test Level".to_string(),
                width,
                height: rows.len(),
                rows,
                obstacles: ObstacleSet::default(),
                policy: MovePolicy::Reject,
                player_spawn: None,
                enemy_spawns: vec![],
                tick_period_ms: 5,
                enemy_throttle: 5,
            },
        }
    }

    pub fn clamp(mut self) -> Self {
        self.def.policy = MovePolicy::Clamp;
        self
    }

    pub fn urban(mut self) -> Self {
        self.def.obstacles = Ruleset::Urban.into();
        self
    }

    pub fn player(mut self, x: usize, y: usize) -> Self {
        self.def.player_spawn = Some(Pos::new(x, y));
        self
    }

    pub fn enemy(mut self, x: usize, y: usize) -> Self {
        self.def.enemy_spawns.push(Pos::new(x, y));
        self
    }

    pub fn throttle(mut self, n: u32) -> Self {
        self.def.enemy_throttle = n;
        self
    }

    pub fn tick_ms(mut self, ms: u64) -> Self {
        self.def.tick_period_ms = ms;
        self
    }

    pub fn build(self) -> LevelDef {
        self.def
    }
}

pub fn state_for(def: &LevelDef) -> GameState {
    build_state(def, &GameConfig::default()).unwrap()
}
