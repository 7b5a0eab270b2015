/// The step function: advances the game by one tick.
///
/// Processing order:
///   1. Message timer
///   2. Command (quit ends the tick; movement runs the resolver for the player)
///   3. Throttled enemy pass
///   4. Contact check + capture policy
///
/// Nothing here draws. Moves are reported as events so the renderer can
/// restore the terrain under every vacated cell before the next frame.

use crate::domain::ai::{self, NpcStep};
use crate::domain::entity::{Command, MoveDir};
use crate::domain::movement::{self, MoveOutcome};
use super::event::GameEvent;
use super::world::{CapturePolicy, GameState, Outcome, Phase};

/// How long the "caught" banner stays on the status line.
const CAUGHT_MESSAGE_MS: u64 = 2000;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(state: &mut GameState, command: Option<Command>) -> Vec<GameEvent> {
    if !state.is_running() { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    state.tick += 1;

    if state.message_timer > 0 {
        state.message_timer -= 1;
        if state.message_timer == 0 { state.message.clear(); }
    }

    match command {
        Some(Command::Quit) => {
            state.phase = Phase::Terminated(Outcome::Quit);
            events.push(GameEvent::QuitRequested);
            return events;
        }
        Some(Command::Move(dir)) => resolve_player_movement(state, dir, &mut events),
        None => {}
    }

    resolve_enemy_pass(state, &mut events);
    resolve_contact(state, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Player movement
// ══════════════════════════════════════════════════════════════

fn resolve_player_movement(state: &mut GameState, dir: MoveDir, events: &mut Vec<GameEvent>) {
    let from = state.player.pos;
    match movement::try_move(&state.grid, state.policy, from, dir) {
        MoveOutcome::Moved(to) => {
            state.player.pos = to;
            // Stepping off an enemy re-arms it, even if its pass lands on us again this tick.
            for npc in state.npcs.alive_mut() {
                if npc.pos != to {
                    npc.in_contact = false;
                }
            }
            events.push(GameEvent::PlayerMoved { from, to });
        }
        MoveOutcome::Blocked => events.push(GameEvent::PlayerBlocked { dir }),
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies (throttled)
// ══════════════════════════════════════════════════════════════

fn resolve_enemy_pass(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.frame_counter += 1;
    if state.frame_counter < state.enemy_throttle { return; }

    let player = state.player.pos;
    let grid = &state.grid;
    let policy = state.policy;
    for npc in state.npcs.alive_mut() {
        match ai::update_npc(npc, player, grid, policy) {
            NpcStep::Moved { from, to } => events.push(GameEvent::NpcMoved { id: npc.id, from, to }),
            NpcStep::Blocked => events.push(GameEvent::NpcBlocked { id: npc.id }),
            NpcStep::Idle => {}
        }
    }

    state.frame_counter = 0;
}

// ══════════════════════════════════════════════════════════════
// Contact
// ══════════════════════════════════════════════════════════════

/// Report each enemy that newly shares the player's cell. Runs every tick,
/// so walking into an enemy counts the same as being reached by one.
fn resolve_contact(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.pos;
    let mut caught = false;

    for npc in state.npcs.alive_mut() {
        let touching = npc.pos == player;
        if touching && !npc.in_contact {
            events.push(GameEvent::Caught { id: npc.id, at: player });
            caught = true;
        }
        npc.in_contact = touching;
    }

    if !caught { return; }
    state.catches += 1;

    match state.capture {
        CapturePolicy::Continue => {
            let ticks = state.ticks_for(CAUGHT_MESSAGE_MS);
            let text = format!("CAUGHT! ({} so far)", state.catches);
            state.set_message(&text, ticks);
        }
        CapturePolicy::End => state.phase = Phase::Terminated(Outcome::Caught),
    }
}
