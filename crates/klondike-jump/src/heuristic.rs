//! Ranking estimates for the search frontier.

use crate::board::{Board, Position};

/// Frontier ranking key.
///
/// `Scored` values order by distance and every `Scored` sorts before
/// `Unscored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Estimate {
    Scored(u32),
    Unscored,
}

impl Estimate {
    pub fn value(self) -> Option<u32> {
        match self {
            Estimate::Scored(d) => Some(d),
            Estimate::Unscored => None,
        }
    }
}

/// Heuristic used to rank frontier positions.
pub trait Heuristic {
    fn estimate(&self, board: &Board, position: Position) -> Estimate;
}

/// Distance from a position to its nearest exit, read from the cost grid.
///
/// Only a ranking key; it is never added to the length of the path walked
/// so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChebyshevHeuristic;

impl Heuristic for ChebyshevHeuristic {
    fn estimate(&self, board: &Board, position: Position) -> Estimate {
        board
            .cost(position)
            .ok()
            .and_then(|cost| cost.distance())
            .map_or(Estimate::Unscored, Estimate::Scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscored_sorts_last() {
        assert!(Estimate::Scored(u32::MAX) < Estimate::Unscored);
        assert!(Estimate::Scored(1) < Estimate::Scored(2));
        assert_eq!(
            [Estimate::Unscored, Estimate::Scored(3)].iter().min(),
            Some(&Estimate::Scored(3))
        );
    }

    #[test]
    fn test_chebyshev_reads_cost_grid() {
        let board = Board::new(vec![
            vec![0, 1, 1],
            vec![1, 1, 2],
            vec![-1, 1, 3],
        ])
        .unwrap();
        let h = ChebyshevHeuristic;

        assert_eq!(h.estimate(&board, Position::new(0, 0)), Estimate::Scored(0));
        assert_eq!(h.estimate(&board, Position::new(2, 2)), Estimate::Scored(2));
        assert_eq!(h.estimate(&board, Position::new(2, 0)), Estimate::Unscored);
        assert_eq!(h.estimate(&board, Position::new(5, 5)), Estimate::Unscored);
    }

    #[test]
    fn test_board_without_exits_is_unscored() {
        let board = Board::new(vec![vec![1, 1], vec![1, 1]]).unwrap();
        assert_eq!(
            ChebyshevHeuristic.estimate(&board, Position::new(1, 1)),
            Estimate::Unscored
        );
    }
}
