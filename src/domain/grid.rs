/// The world grid: terrain ground truth for one level.
///
/// Dimensions are runtime values declared by the level and enforced at load.
/// The grid never changes after load; actors are drawn over it and the
/// terrain glyph is restored from here when they move away.

use super::entity::Pos;
use super::tile::{ObstacleSet, Tile};
use crate::error::LevelError;

#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
    /// Each row pre-joined for full-row output.
    lines: Vec<String>,
    obstacles: ObstacleSet,
}

impl Grid {
    /// Copy level rows into a new grid. The source must be exactly
    /// `width` x `height` characters; anything else is a configuration error.
    pub fn load<S: AsRef<str>>(
        width: usize,
        height: usize,
        rows: &[S],
        obstacles: ObstacleSet,
    ) -> Result<Self, LevelError> {
        let bad_row = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .enumerate()
            .find(|&(_, w)| w != width);

        if rows.len() != height || bad_row.is_some() || width == 0 || height == 0 {
            return Err(LevelError::Dimensions {
                expected_width: width,
                expected_height: height,
                found_rows: rows.len(),
                bad_row,
            });
        }

        let tiles = rows
            .iter()
            .map(|r| r.as_ref().chars().map(Tile::new).collect())
            .collect();
        let lines = rows.iter().map(|r| r.as_ref().to_string()).collect();

        Ok(Grid { width, height, tiles, lines, obstacles })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Is the signed candidate inside `[0, W) x [0, H)`?
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Terrain at an in-bounds cell. Out-of-bounds access is a bug upstream.
    pub fn tile_at(&self, pos: Pos) -> Tile {
        self.tiles[pos.y][pos.x]
    }

    pub fn is_obstacle(&self, tile: Tile) -> bool {
        self.obstacles.is_obstacle(tile)
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn row_text(&self, y: usize) -> &str {
        &self.lines[y]
    }
}
