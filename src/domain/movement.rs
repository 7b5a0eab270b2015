/// Movement resolution: pure functions, no side effects.
///
/// Encodes "where may this actor go" without applying the move. Player and
/// enemies share the same rules.
///
/// ## Policies
///
/// ┌──────────────────────────┬──────────────┬─────────────┐
/// │ Condition                 │ Reject       │ Clamp       │
/// ├──────────────────────────┼──────────────┼─────────────┤
/// │ Dest out of bounds        │ Blocked      │ clamped     │
/// │ Dest in boundary ring     │ (tile rules) │ clamped     │
/// │ Dest tile is obstacle     │ Blocked      │ ignored     │
/// │ Clamped != one unit step  │ n/a          │ Blocked     │
/// │ Otherwise                 │ Moved        │ Moved       │
/// └──────────────────────────┴──────────────┴─────────────┘
///
/// Clamp is for open-field levels whose only obstacle is the outer wall. It
/// clamps only the axis being moved, so an actor can never slide diagonally
/// or backwards; clamp levels reject spawns outside the inset.

use super::entity::{MoveDir, Pos};
use super::grid::Grid;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MovePolicy {
    /// Bounds check, then obstacle check.
    #[default]
    Reject,
    /// Keep actors inside the 1-cell inset of the boundary.
    Clamp,
}

impl MovePolicy {
    pub fn from_name(name: &str) -> Option<MovePolicy> {
        match name.to_lowercase().as_str() {
            "reject" => Some(MovePolicy::Reject),
            "clamp" => Some(MovePolicy::Clamp),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Moved(Pos),
    Blocked,
}

pub fn try_move(grid: &Grid, policy: MovePolicy, from: Pos, dir: MoveDir) -> MoveOutcome {
    let (dx, dy) = dir.delta();
    let cx = from.x as i64 + dx;
    let cy = from.y as i64 + dy;

    match policy {
        MovePolicy::Reject => {
            if !grid.in_bounds(cx, cy) {
                return MoveOutcome::Blocked;
            }
            let to = Pos::new(cx as usize, cy as usize);
            if grid.is_obstacle(grid.tile_at(to)) {
                return MoveOutcome::Blocked;
            }
            MoveOutcome::Moved(to)
        }
        MovePolicy::Clamp => {
            // Only the axis of the intent is clamped.
            let to = if dx != 0 {
                Pos::new(clamp_inset(cx, grid.width()), from.y)
            } else {
                Pos::new(from.x, clamp_inset(cy, grid.height()))
            };
            let moved = (to.x as i64 - from.x as i64, to.y as i64 - from.y as i64);
            if moved == (dx, dy) {
                MoveOutcome::Moved(to)
            } else {
                MoveOutcome::Blocked
            }
        }
    }
}

/// Is `pos` inside the region clamp levels keep actors in?
pub fn within_clamp_inset(grid: &Grid, pos: Pos) -> bool {
    clamp_inset(pos.x as i64, grid.width()) == pos.x
        && clamp_inset(pos.y as i64, grid.height()) == pos.y
}

/// Clamp into `[1, len-2]`; degenerate axes fall back to `[0, len-1]`.
fn clamp_inset(v: i64, len: usize) -> usize {
    let len = len as i64;
    let (lo, hi) = if len >= 3 { (1, len - 2) } else { (0, len - 1) };
    v.clamp(lo, hi.max(lo)) as usize
}
