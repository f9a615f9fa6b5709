//! Path replay with metrics tracking.
//!
//! Replays a route leap by leap under the same rule the search uses and
//! reports where it first goes wrong, if anywhere.

use std::collections::HashSet;

use crate::board::{Board, Position};
use crate::moves::is_legal_leap;

/// Result status of a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Every leap is legal and the route ends on an exit
    Solved,
    /// No positions at all
    Empty,
    /// Position at this index is off the board or on an invalid cell
    InvalidCell { index: usize },
    /// The leap arriving at this index breaks the leap rule
    IllegalLeap { index: usize },
    /// Every leap is legal but the last position is not an exit
    NotAtExit,
}

/// Metrics collected during replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMetrics {
    pub jumps: usize,
    /// Sum of leap lengths, in cells
    pub distance: u32,
    pub longest_jump: u32,
    pub cells_visited: usize,
}

#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub metrics: PathMetrics,
    pub solved: bool,
}

impl VerificationResult {
    fn stop(status: VerificationStatus, metrics: PathMetrics) -> Self {
        Self {
            status,
            metrics,
            solved: status == VerificationStatus::Solved,
        }
    }
}

/// Replay `route` on `board`.
pub fn verify_path(board: &Board, route: &[Position]) -> VerificationResult {
    let mut metrics = PathMetrics::default();

    let Some(&first) = route.first() else {
        return VerificationResult::stop(VerificationStatus::Empty, metrics);
    };
    if !board.cell(first).is_ok_and(|kind| !kind.is_invalid()) {
        return VerificationResult::stop(VerificationStatus::InvalidCell { index: 0 }, metrics);
    }

    let mut visited = HashSet::new();
    visited.insert(first);
    metrics.cells_visited = 1;

    for (index, pair) in route.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let index = index + 1;

        if !board.cell(to).is_ok_and(|kind| !kind.is_invalid()) {
            return VerificationResult::stop(VerificationStatus::InvalidCell { index }, metrics);
        }
        if !is_legal_leap(board, from, to) {
            return VerificationResult::stop(VerificationStatus::IllegalLeap { index }, metrics);
        }

        let length = from.chebyshev(to);
        metrics.jumps += 1;
        metrics.distance += length;
        metrics.longest_jump = metrics.longest_jump.max(length);
        if visited.insert(to) {
            metrics.cells_visited += 1;
        }
    }

    let at_exit = route
        .last()
        .is_some_and(|&p| board.cell(p).is_ok_and(|kind| kind.is_exit()));
    if at_exit {
        VerificationResult::stop(VerificationStatus::Solved, metrics)
    } else {
        VerificationResult::stop(VerificationStatus::NotAtExit, metrics)
    }
}

/// Simple verification: does the route solve the board?
pub fn verify_solution(board: &Board, route: &[Position]) -> bool {
    verify_path(board, route).solved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_simple_board() -> Board {
        Board::new(vec![
            vec![2, 1, 3, -1],
            vec![1, 1, 1, 1],
            vec![1, 1, 1, 1],
            vec![0, -1, 1, 0],
        ])
        .unwrap()
    }

    fn route(points: &[(i32, i32)]) -> Vec<Position> {
        points.iter().map(|&(r, c)| Position::new(r, c)).collect()
    }

    #[test]
    fn test_solved_route() {
        let board = create_simple_board();
        // (0, 0) leaps 2 south to (2, 0), then 1 south to the exit
        let result = verify_path(&board, &route(&[(0, 0), (2, 0), (3, 0)]));

        assert_eq!(result.status, VerificationStatus::Solved);
        assert!(result.solved);
        assert_eq!(
            result.metrics,
            PathMetrics {
                jumps: 2,
                distance: 3,
                longest_jump: 2,
                cells_visited: 3,
            }
        );
    }

    #[test]
    fn test_wrong_length_leap() {
        let board = create_simple_board();
        let result = verify_path(&board, &route(&[(0, 0), (1, 0)]));
        assert_eq!(result.status, VerificationStatus::IllegalLeap { index: 1 });
        assert!(!verify_solution(&board, &route(&[(0, 0), (1, 0)])));
    }

    #[test]
    fn test_invalid_cells() {
        let board = create_simple_board();
        assert_eq!(
            verify_path(&board, &route(&[(0, 3)])).status,
            VerificationStatus::InvalidCell { index: 0 }
        );
        assert_eq!(
            verify_path(&board, &route(&[(0, 1), (0, 2), (9, 9)])).status,
            VerificationStatus::InvalidCell { index: 2 }
        );
    }

    #[test]
    fn test_route_must_end_on_exit() {
        let board = create_simple_board();
        let result = verify_path(&board, &route(&[(0, 1), (1, 1)]));
        assert_eq!(result.status, VerificationStatus::NotAtExit);
        assert_eq!(result.metrics.jumps, 1);

        assert_eq!(verify_path(&board, &[]).status, VerificationStatus::Empty);
    }
}
