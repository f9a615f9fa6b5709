//! Leap rule and search states.
//!
//! From a cell holding `v`, the token leaps exactly `v` cells along one of
//! the eight compass rays. A leap is refused when it leaves the board, when
//! it lands on an invalid cell, or when the cell one step short of the
//! landing square is an exit: the token may not pass over an exit next to
//! its landing square. The last check applies even when the landing square
//! is itself an exit.

use std::hash::{Hash, Hasher};

use serde::Serialize;
use smallvec::SmallVec;

use crate::board::{Board, CellKind, Position};

/// Index of a state in the search arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A discovered board position.
///
/// Two states are equal when they sit on the same coordinates, whatever
/// their parent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct State {
    #[serde(flatten)]
    pub position: Position,
    /// Leap length read from the board, `0` on an exit
    #[serde(rename = "value")]
    pub jump: u32,
    /// State this one was discovered from; `None` for the search root
    #[serde(skip)]
    pub parent: Option<NodeId>,
}

impl State {
    pub fn new(position: Position, jump: u32, parent: Option<NodeId>) -> Self {
        Self {
            position,
            jump,
            parent,
        }
    }

    pub fn row(&self) -> i32 {
        self.position.row
    }

    pub fn col(&self) -> i32 {
        self.position.col
    }

    pub fn is_exit(&self) -> bool {
        self.jump == 0
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

/// At most one legal leap per compass direction.
pub type Targets = SmallVec<[(Position, CellKind); 8]>;

pub type Neighbors = SmallVec<[State; 8]>;

/// Legal landing squares for a leap of `jump` cells from `origin`.
///
/// Candidates are visited row-major over `(row - v, row, row + v) ×
/// (col - v, col, col + v)`, which fixes the order of the result.
pub fn leap_targets(board: &Board, origin: Position, jump: u32) -> Targets {
    let mut out = Targets::new();
    if jump == 0 {
        return out;
    }
    let v = jump as i32;

    for d_row in [-v, 0, v] {
        for d_col in [-v, 0, v] {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            let Some(target) = origin.offset(d_row, d_col) else {
                continue;
            };
            let Ok(kind) = board.cell(target) else {
                continue;
            };

            let penultimate = target.offset(-d_row.signum(), -d_col.signum());
            if penultimate.is_some_and(|p| board.cell(p).is_ok_and(CellKind::is_exit)) {
                continue;
            }
            if kind.is_invalid() {
                continue;
            }
            out.push((target, kind));
        }
    }
    out
}

/// States reachable in one leap from `state`, which lives at `id` in the
/// arena. Never called on an exit: the search stops first.
pub fn neighbors(board: &Board, id: NodeId, state: &State) -> Neighbors {
    let mut out = Neighbors::new();
    for (position, kind) in leap_targets(board, state.position, state.jump) {
        let next = State::new(position, kind.jump_distance(), Some(id));
        // first discovery wins
        if !out.contains(&next) {
            out.push(next);
        }
    }
    out
}

/// Whether a single leap from `from` lands on `to`.
pub fn is_legal_leap(board: &Board, from: Position, to: Position) -> bool {
    match board.cell(from) {
        Ok(CellKind::Jump(v)) => leap_targets(board, from, v).iter().any(|&(p, _)| p == to),
        _ => false,
    }
}
