//! Error types for board construction and search setup.
//!
//! Failing to find a path is not an error: it is reported through
//! [`SearchOutcome::Exhausted`](crate::search::SearchOutcome::Exhausted).

use thiserror::Error;

use crate::board::Position;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The raw grid is empty, jagged, not square, or holds an unknown value.
    #[error("invalid board: {0}")]
    BoardFormat(String),

    /// A coordinate accessor was given a position outside the grid.
    #[error("position ({}, {}) is outside the {size}x{size} board", .position.row, .position.col)]
    OutOfBounds { position: Position, size: usize },

    /// The search was asked to start on an invalid cell.
    #[error("cannot start a search on invalid cell ({}, {})", .0.row, .0.col)]
    InvalidStart(Position),

    /// Board description could not be parsed.
    #[error("board JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
