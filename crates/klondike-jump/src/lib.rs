//! Solver for Sam Loyd's *Back from the Klondike* jump-board puzzles.
//!
//! Each cell of a square board holds a leap length, an exit (`0`) or an
//! invalid marker (`-1`). From a starting cell the token leaps exactly the
//! cell's value in one of eight compass directions until it lands on an
//! exit. This crate finds such a route with a greedy best-first search
//! ranked by the distance from each cell to its nearest exit.

pub mod board;
pub mod error;
pub mod heuristic;
pub mod logging;
pub mod moves;
pub mod render;
pub mod search;
pub mod verify;

// Re-export main types
pub use board::{Board, BoardConfig, CellKind, Cost, Position, EXIT, INVALID};
pub use error::{Error, Result};
pub use heuristic::{ChebyshevHeuristic, Estimate, Heuristic};
pub use moves::{is_legal_leap, leap_targets, neighbors, NodeId, State};
pub use render::render;
pub use search::{
    reconstruct, solve, Path, Search, SearchBudget, SearchContext, SearchOutcome, SearchStats,
    SearchStatus, Solution, Step,
};
pub use verify::{verify_path, verify_solution, PathMetrics, VerificationResult, VerificationStatus};
