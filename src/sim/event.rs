/// Events emitted during a tick.
/// The renderer consumes the moves (to erase vacated cells); the loop logs the rest.

use crate::domain::entity::{MoveDir, Pos};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { from: Pos, to: Pos },
    PlayerBlocked { dir: MoveDir },
    NpcMoved { id: usize, from: Pos, to: Pos },
    NpcBlocked { id: usize },
    Caught { id: usize, at: Pos },
    QuitRequested,
}

impl GameEvent {
    /// The cell an actor left this tick, if the event is a move.
    pub fn vacated(&self) -> Option<Pos> {
        match *self {
            GameEvent::PlayerMoved { from, .. } | GameEvent::NpcMoved { from, .. } => Some(from),
            _ => None,
        }
    }
}
