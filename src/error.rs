//! Error types for level loading and engine startup.

use std::io;

use thiserror::Error;

/// Problems with level data. All of these are fatal before the frame loop starts.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error(
        "level grid must be {expected_width}x{expected_height}: \
         found {found_rows} rows{}",
        bad_row_note(.bad_row)
    )]
    Dimensions {
        expected_width: usize,
        expected_height: usize,
        found_rows: usize,
        /// First row whose width is wrong: (row index, width found).
        bad_row: Option<(usize, usize)>,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("level is missing its `@ size WxH` declaration")]
    MissingSize,

    #[error("{what} spawn ({x}, {y}) lies outside the {width}x{height} grid")]
    SpawnOutOfBounds {
        what: &'static str,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("{what} spawn ({x}, {y}) is on the boundary ring; clamp levels keep actors one cell inside")]
    SpawnOutsideInset { what: &'static str, x: usize, y: usize },

    #[error("level declares {found} enemies, roster holds at most {max}")]
    TooManyEnemies { found: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn bad_row_note(bad_row: &Option<(usize, usize)>) -> String {
    match bad_row {
        Some((y, w)) => format!(", row {y} is {w} wide"),
        None => String::new(),
    }
}

/// Top-level failures surfaced by `main`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid level: {0}")]
    Level(#[from] LevelError),

    #[error("no level named `{0}`")]
    UnknownLevel(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
