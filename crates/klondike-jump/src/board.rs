//! Board representation and the precomputed cost grid.
//!
//! A board is an N×N grid of integers: `-1` marks a cell that is not part of
//! the board, `0` marks an exit, and any positive value is the exact number
//! of cells the token must leap from that cell. Boards are described in JSON
//! (see [`BoardConfig`]) and are immutable once built.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw value of a cell that is not part of the board.
pub const INVALID: i32 = -1;

/// Raw value of an exit cell.
pub const EXIT: i32 = 0;

/// The 23×23 board from Sam Loyd's puzzle.
const REFERENCE_BOARD: &str = include_str!("../boards/klondike.json");

/// Position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Shifted position, or `None` if a coordinate overflows.
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Some(Self::new(
            self.row.checked_add(d_row)?,
            self.col.checked_add(d_col)?,
        ))
    }

    /// Chessboard distance: `max(|Δrow|, |Δcol|)`.
    pub fn chebyshev(self, other: Position) -> u32 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

/// Classification of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Invalid,
    Exit,
    /// Mandatory leap length, always at least 1
    Jump(u32),
}

impl CellKind {
    /// Classify a raw cell value. Values below `-1` have no meaning.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            INVALID => Some(CellKind::Invalid),
            EXIT => Some(CellKind::Exit),
            v if v > 0 => Some(CellKind::Jump(v as u32)),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        match self {
            CellKind::Invalid => INVALID,
            CellKind::Exit => EXIT,
            CellKind::Jump(k) => k as i32,
        }
    }

    pub fn is_exit(self) -> bool {
        self == CellKind::Exit
    }

    pub fn is_invalid(self) -> bool {
        self == CellKind::Invalid
    }

    /// Leap length from this cell; zero for exits and invalid cells.
    pub fn jump_distance(self) -> u32 {
        match self {
            CellKind::Jump(k) => k,
            _ => 0,
        }
    }
}

/// Entry of the cost grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cost {
    /// Mirrors an invalid board cell
    Invalid,
    /// Chebyshev distance to the nearest exit
    Distance(u32),
    /// The board has no exit at all
    NoExit,
}

impl Cost {
    pub fn distance(self) -> Option<u32> {
        match self {
            Cost::Distance(d) => Some(d),
            _ => None,
        }
    }
}

/// Immutable square board with its cost grid, both stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<CellKind>,
    costs: Vec<Cost>,
}

impl Board {
    /// Build a board from raw rows, validating shape and values.
    pub fn new(rows: Vec<Vec<i32>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(Error::BoardFormat("board has no rows".to_string()));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(Error::BoardFormat(format!(
                    "row {} has {} cells, expected {} for a square board",
                    r,
                    row.len(),
                    size
                )));
            }
            for (c, &value) in row.iter().enumerate() {
                let kind = CellKind::from_value(value).ok_or_else(|| {
                    Error::BoardFormat(format!("cell ({}, {}) has unknown value {}", r, c, value))
                })?;
                cells.push(kind);
            }
        }

        let costs = cost_grid(size, &cells);
        Ok(Self { size, cells, costs })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    pub fn cell(&self, position: Position) -> Result<CellKind> {
        self.index(position)
            .map(|i| self.cells[i])
            .ok_or_else(|| self.out_of_bounds(position))
    }

    pub fn value(&self, position: Position) -> Result<i32> {
        self.cell(position).map(CellKind::value)
    }

    pub fn cost(&self, position: Position) -> Result<Cost> {
        self.index(position)
            .map(|i| self.costs[i])
            .ok_or_else(|| self.out_of_bounds(position))
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let n = self.size as i32;
        (0..n).flat_map(move |row| (0..n).map(move |col| Position::new(row, col)))
    }

    pub fn exits(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions()
            .zip(self.cells.iter())
            .filter(|(_, kind)| kind.is_exit())
            .map(|(p, _)| p)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.row < 0 || position.col < 0 {
            return None;
        }
        let (row, col) = (position.row as usize, position.col as usize);
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(row * self.size + col)
    }

    fn out_of_bounds(&self, position: Position) -> Error {
        Error::OutOfBounds {
            position,
            size: self.size,
        }
    }
}

/// Distance from every cell to its nearest exit.
fn cost_grid(size: usize, cells: &[CellKind]) -> Vec<Cost> {
    let at = |i: usize| Position::new((i / size) as i32, (i % size) as i32);
    let exits: Vec<Position> = (0..cells.len())
        .filter(|&i| cells[i].is_exit())
        .map(at)
        .collect();

    cells
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            if kind.is_invalid() {
                return Cost::Invalid;
            }
            let here = at(i);
            exits
                .iter()
                .map(|&exit| here.chebyshev(exit))
                .min()
                .map_or(Cost::NoExit, Cost::Distance)
        })
        .collect()
}

/// Board description as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub name: String,
    /// Suggested starting position
    #[serde(default)]
    pub start: Option<Position>,
    pub cells: Vec<Vec<i32>>,
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The embedded reference puzzle.
    pub fn reference() -> Result<Self> {
        Self::from_json(REFERENCE_BOARD)
    }

    pub fn board(&self) -> Result<Board> {
        Board::new(self.cells.clone())
    }
}
