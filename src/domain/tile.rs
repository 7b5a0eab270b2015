/// Tiles and obstacle classification.
///
/// A tile is just the terrain character drawn in its cell. Whether it blocks
/// movement is decided by the level's `ObstacleSet`, so one glyph alphabet
/// can serve both art and terrain.

use std::collections::BTreeSet;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Tile(char);

impl Tile {
    /// Open ground.
    pub const FLOOR: Tile = Tile(' ');
    /// Boundary wall, an obstacle in every ruleset.
    pub const WALL: Tile = Tile('#');

    pub fn new(glyph: char) -> Self {
        Tile(glyph)
    }

    pub fn glyph(self) -> char {
        self.0
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::FLOOR
    }
}

/// Built-in obstacle alphabets, one per map theme.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Ruleset {
    /// Open field: only the `#` boundary blocks.
    Boundary,
    /// Garden: pond walls, water, tree parts and boulders.
    Garden,
    /// Urban: building walls and corners, cars, lampposts.
    Urban,
}

impl Ruleset {
    pub fn glyphs(self) -> &'static str {
        match self {
            Ruleset::Boundary => "#",
            Ruleset::Garden => "#|-~/\\{}()_B",
            Ruleset::Urban => "#+|-XT",
        }
    }

    pub fn from_name(name: &str) -> Option<Ruleset> {
        match name.to_lowercase().as_str() {
            "boundary" | "open" => Some(Ruleset::Boundary),
            "garden" => Some(Ruleset::Garden),
            "urban" => Some(Ruleset::Urban),
            _ => None,
        }
    }
}

/// The set of glyphs that block movement. Everything else is traversable,
/// including characters the set has never heard of.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ObstacleSet {
    glyphs: BTreeSet<char>,
}

impl ObstacleSet {
    pub fn from_glyphs(glyphs: &str) -> Self {
        ObstacleSet {
            glyphs: glyphs.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn is_obstacle(&self, tile: Tile) -> bool {
        self.glyphs.contains(&tile.glyph())
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }
}

impl From<Ruleset> for ObstacleSet {
    fn from(ruleset: Ruleset) -> Self {
        ObstacleSet::from_glyphs(ruleset.glyphs())
    }
}

impl Default for ObstacleSet {
    fn default() -> Self {
        Ruleset::Boundary.into()
    }
}
