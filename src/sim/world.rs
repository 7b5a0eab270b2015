/// GameState: everything a running level owns.
///
/// Built once per level by `level::build_state` and then owned by the frame
/// loop, which hands it by reference to the tick and the renderer. Nothing
/// here is global.
///
/// The grid is never mutated after load. Only actor positions, the frame
/// counter and the status message change from tick to tick.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::entity::{NpcRoster, Player};
use crate::domain::grid::Grid;
use crate::domain::movement::MovePolicy;

/// What happens when an enemy reaches the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapturePolicy {
    /// Announce on the status line and keep playing.
    #[default]
    Continue,
    /// End the session.
    End,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Quit,
    Caught,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    Terminated(Outcome),
}

#[derive(Debug)]
pub struct GameState {
    // ── Level ──
    pub level_name: String,
    pub grid: Grid,
    pub policy: MovePolicy,

    // ── Entities ──
    pub player: Player,
    pub npcs: NpcRoster,

    // ── Pacing ──
    /// Ticks between enemy update passes.
    pub enemy_throttle: u32,
    /// Ticks since the last enemy pass. Reset to 0 right after each pass.
    pub frame_counter: u32,
    pub tick_period: Duration,
    pub tick: u64,

    // ── Meta ──
    pub capture: CapturePolicy,
    pub phase: Phase,
    pub catches: u32,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Show a status message for `ticks` ticks (0 = until replaced).
    pub fn set_message(&mut self, text: &str, ticks: u32) {
        self.message = text.to_string();
        self.message_timer = ticks;
    }

    /// Ticks that cover roughly `ms` milliseconds at this level's pace.
    pub fn ticks_for(&self, ms: u64) -> u32 {
        let period = self.tick_period.as_millis().max(1) as u64;
        (ms / period).clamp(1, u32::MAX as u64) as u32
    }
}
