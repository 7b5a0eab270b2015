/// Enemy AI: greedy pursuit.
///
/// Each pass, an enemy steps one cell toward the player along whichever axis
/// has the larger offset (ties go vertical). The step goes through the same
/// movement rules as the player; a blocked enemy waits for the next pass.
/// No pathfinding, no backtracking.

use super::entity::{MoveDir, Npc, Pos};
use super::grid::Grid;
use super::movement::{self, MoveOutcome, MovePolicy};

/// Result of one AI update for one enemy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NpcStep {
    Moved { from: Pos, to: Pos },
    Blocked,
    /// Already on the player's cell, or dead.
    Idle,
}

/// Direction of the greedy step from `from` toward `target`, if any.
pub fn pursuit_dir(from: Pos, target: Pos) -> Option<MoveDir> {
    let dx = target.x as i64 - from.x as i64;
    let dy = target.y as i64 - from.y as i64;

    if dx.abs() > dy.abs() {
        Some(if dx > 0 { MoveDir::Right } else { MoveDir::Left })
    } else if dy != 0 {
        Some(if dy > 0 { MoveDir::Down } else { MoveDir::Up })
    } else {
        None
    }
}

pub fn update_npc(npc: &mut Npc, player: Pos, grid: &Grid, policy: MovePolicy) -> NpcStep {
    if !npc.alive {
        return NpcStep::Idle;
    }
    let dir = match pursuit_dir(npc.pos, player) {
        Some(d) => d,
        None => return NpcStep::Idle,
    };

    match movement::try_move(grid, policy, npc.pos, dir) {
        MoveOutcome::Moved(to) => {
            let from = npc.pos;
            npc.pos = to;
            NpcStep::Moved { from, to }
        }
        MoveOutcome::Blocked => NpcStep::Blocked,
    }
}
