/// Entities: the player and the enemy roster.
/// Positions are plain grid coordinates; movement legality lives in `movement`.

/// Roster capacity. Levels declaring more enemies are rejected at load.
pub const MAX_ENEMIES: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }
}

/// Movement intent: one unit step on one axis.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub fn delta(self) -> (i64, i64) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }
}

/// One tick's worth of player input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(MoveDir),
    Quit,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Pos,
    pub glyph: char,
}

impl Player {
    pub fn new(pos: Pos, glyph: char) -> Self {
        Player { pos, glyph }
    }
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub id: usize,
    pub pos: Pos,
    pub glyph: char,
    pub alive: bool,
    /// Set while sharing the player's cell; a catch is reported on the rising edge.
    pub in_contact: bool,
}

impl Npc {
    pub fn new(id: usize, pos: Pos, glyph: char) -> Self {
        Npc {
            id,
            pos,
            glyph,
            alive: true,
            in_contact: false,
        }
    }

    /// Alive → Dead. Dead is terminal: the slot stays, but the NPC is no
    /// longer updated, drawn or checked for contact.
    #[allow(dead_code)]
    pub fn deactivate(&mut self) {
        self.alive = false;
        self.in_contact = false;
    }
}

/// Fixed-size, order-stable NPC roster. Built once per level, never resized.
#[derive(Clone, Debug)]
pub struct NpcRoster {
    slots: Box<[Npc]>,
}

impl NpcRoster {
    /// Callers validate `spawns.len() <= MAX_ENEMIES` before building.
    pub fn new(spawns: &[Pos], glyph: char) -> Self {
        debug_assert!(spawns.len() <= MAX_ENEMIES);
        let slots = spawns
            .iter()
            .enumerate()
            .map(|(id, &pos)| Npc::new(id, pos, glyph))
            .collect();
        NpcRoster { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Npc> {
        self.slots.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Npc> {
        self.slots.iter().filter(|n| n.alive)
    }

    pub fn alive_mut(&mut self) -> impl Iterator<Item = &mut Npc> {
        self.slots.iter_mut().filter(|n| n.alive)
    }

    #[allow(dead_code)]
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Npc> {
        self.slots.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_keeps_slot_order() {
        let roster = NpcRoster::new(&[Pos::new(1, 1), Pos::new(5, 2), Pos::new(9, 3)], 'E');
        let ids: Vec<usize> = roster.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(roster.iter().all(|n| n.alive && n.glyph == 'E'));
    }

    #[test]
    fn deactivated_npc_keeps_its_slot() {
        let mut roster = NpcRoster::new(&[Pos::new(1, 1), Pos::new(5, 2)], 'E');
        roster.get_mut(0).unwrap().deactivate();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.alive().count(), 1);
        assert_eq!(roster.alive().next().unwrap().id, 1);
    }

    #[test]
    fn deltas_are_single_axis_unit_steps() {
        for dir in [MoveDir::Left, MoveDir::Right, MoveDir::Up, MoveDir::Down] {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }
}
