//! Greedy best-first search over leap states.
//!
//! The frontier is ranked purely by the heuristic estimate of each
//! position; the number of leaps already taken plays no part, so the path
//! found is some solution, not necessarily the shortest one.
//!
//! All mutable search state lives in a [`SearchContext`] built fresh for
//! every [`Search`]. The board is only ever borrowed immutably.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

use crate::board::{Board, Position};
use crate::error::{Error, Result};
use crate::heuristic::{ChebyshevHeuristic, Estimate, Heuristic};
use crate::moves::{neighbors, NodeId, State};

/// Limits for [`Search::run_bounded`]
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    /// Stop after this many expansions
    pub max_expansions: Option<usize>,
    /// Stop once this much wall-clock time has passed
    pub timeout: Option<Duration>,
}

/// Counters reported with every outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Positions moved from the frontier to the explored set
    pub expanded: usize,
    /// Distinct positions ever scored
    pub discovered: usize,
    pub time_elapsed_ms: u64,
}

/// Ordered route from the start to an exit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<State>);

impl Path {
    pub fn states(&self) -> &[State] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of leaps, one less than the number of states.
    pub fn jumps(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.0.iter().map(|s| s.position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, State> {
        self.0.iter()
    }
}

impl From<Vec<State>> for Path {
    fn from(states: Vec<State>) -> Self {
        Self(states)
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub path: Path,
    pub stats: SearchStats,
}

/// Result of a search that ran without a construction error
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Reached an exit
    Found(Solution),
    /// The frontier ran dry; no exit is reachable from the start
    Exhausted(SearchStats),
    /// A [`SearchBudget`] limit was hit first
    Interrupted(SearchStats),
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Found(solution) => &solution.stats,
            SearchOutcome::Exhausted(stats) | SearchOutcome::Interrupted(stats) => stats,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Searching,
    Succeeded(NodeId),
    Failed,
}

/// What a single call to [`Search::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Expanded one position; the search goes on
    Expanded(NodeId),
    Found(NodeId),
    Exhausted,
}

/// Per-search bookkeeping: the state arena, frontier, explored set and
/// score memo.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    nodes: Vec<State>,
    index: HashMap<Position, NodeId>,
    /// Discovered but not yet expanded, in discovery order
    frontier: Vec<NodeId>,
    explored: HashSet<Position>,
    /// Written once per position, never updated
    scores: HashMap<Position, Estimate>,
}

impl SearchContext {
    fn with_root(root: State, estimate: Estimate) -> Self {
        let mut ctx = Self::default();
        ctx.discover(root, estimate);
        ctx
    }

    fn discover(&mut self, state: State, estimate: Estimate) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(state);
        self.index.insert(state.position, id);
        self.scores.insert(state.position, estimate);
        self.frontier.push(id);
        id
    }

    /// Frontier slot holding the lowest estimate; the earliest discovered
    /// wins ties.
    fn select(&self) -> Option<usize> {
        self.frontier
            .iter()
            .enumerate()
            .min_by_key(|(_, id)| self.score(self.nodes[id.0].position))
            .map(|(slot, _)| slot)
    }

    /// State stored under `id`, if `id` belongs to this search.
    pub fn state(&self, id: NodeId) -> Option<&State> {
        self.nodes.get(id.0)
    }

    pub fn state_at(&self, position: Position) -> Option<&State> {
        self.index.get(&position).and_then(|&id| self.state(id))
    }

    pub fn score(&self, position: Position) -> Estimate {
        self.scores
            .get(&position)
            .copied()
            .unwrap_or(Estimate::Unscored)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_explored(&self, position: Position) -> bool {
        self.explored.contains(&position)
    }

    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }

    pub fn discovered(&self) -> usize {
        self.scores.len()
    }
}

/// Follow parent links from `goal` back to the root and return the route
/// in walking order. `None` if `goal` is not a state of this search.
pub fn reconstruct(ctx: &SearchContext, goal: NodeId) -> Option<Path> {
    let mut states = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        let state = ctx.state(id)?;
        states.push(*state);
        cursor = state.parent;
    }
    states.reverse();
    Some(Path(states))
}

/// One search invocation from a fixed start.
pub struct Search<'a, H: Heuristic = ChebyshevHeuristic> {
    board: &'a Board,
    heuristic: H,
    ctx: SearchContext,
    status: SearchStatus,
    started: Instant,
}

impl<'a> Search<'a> {
    pub fn new(board: &'a Board, start: Position) -> Result<Self> {
        Self::with_heuristic(board, start, ChebyshevHeuristic)
    }
}

impl<'a, H: Heuristic> Search<'a, H> {
    pub fn with_heuristic(board: &'a Board, start: Position, heuristic: H) -> Result<Self> {
        let kind = board.cell(start)?;
        if kind.is_invalid() {
            return Err(Error::InvalidStart(start));
        }

        let root = State::new(start, kind.jump_distance(), None);
        let estimate = heuristic.estimate(board, start);

        Ok(Self {
            board,
            heuristic,
            ctx: SearchContext::with_root(root, estimate),
            status: SearchStatus::Searching,
            started: Instant::now(),
        })
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn context(&self) -> &SearchContext {
        &self.ctx
    }

    /// Select the best frontier position and either stop on it or expand it.
    pub fn step(&mut self) -> Step {
        match self.status {
            SearchStatus::Succeeded(goal) => return Step::Found(goal),
            SearchStatus::Failed => return Step::Exhausted,
            SearchStatus::Searching => {}
        }

        let Some(slot) = self.ctx.select() else {
            self.status = SearchStatus::Failed;
            return Step::Exhausted;
        };
        let id = self.ctx.frontier[slot];
        let current = self.ctx.nodes[id.0];

        if current.is_exit() {
            self.status = SearchStatus::Succeeded(id);
            return Step::Found(id);
        }

        self.ctx.frontier.remove(slot);
        self.ctx.explored.insert(current.position);

        for next in neighbors(self.board, id, &current) {
            if self.ctx.explored.contains(&next.position)
                || self.ctx.scores.contains_key(&next.position)
            {
                continue;
            }
            let estimate = self.heuristic.estimate(self.board, next.position);
            self.ctx.discover(next, estimate);
        }

        trace!(
            row = current.position.row,
            col = current.position.col,
            jump = current.jump,
            frontier = self.ctx.frontier.len(),
            "expanded"
        );
        Step::Expanded(id)
    }

    /// Run until an exit is reached or the frontier is empty.
    pub fn run(mut self) -> SearchOutcome {
        while let Step::Expanded(_) = self.step() {}
        self.finish()
    }

    /// Like [`run`](Self::run), but give up once `budget` is spent.
    ///
    /// The budget is checked before every step, so a zero budget does no
    /// work at all.
    pub fn run_bounded(mut self, budget: &SearchBudget) -> SearchOutcome {
        let deadline = budget.timeout.map(|t| self.started + t);

        loop {
            let over_expansions = budget
                .max_expansions
                .is_some_and(|max| self.ctx.explored.len() >= max);
            let over_time = deadline.is_some_and(|d| Instant::now() >= d);
            if over_expansions || over_time {
                break;
            }
            if !matches!(self.step(), Step::Expanded(_)) {
                break;
            }
        }
        self.finish()
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            expanded: self.ctx.explored.len(),
            discovered: self.ctx.discovered(),
            time_elapsed_ms: self.started.elapsed().as_millis() as u64,
        }
    }

    fn finish(self) -> SearchOutcome {
        let stats = self.stats();
        match self.status {
            SearchStatus::Succeeded(goal) => {
                // goal always comes from this search's own arena
                let Some(path) = reconstruct(&self.ctx, goal) else {
                    return SearchOutcome::Exhausted(stats);
                };
                debug!(
                    jumps = path.jumps(),
                    expanded = stats.expanded,
                    discovered = stats.discovered,
                    "search succeeded"
                );
                SearchOutcome::Found(Solution { path, stats })
            }
            SearchStatus::Failed => {
                debug!(expanded = stats.expanded, "search exhausted");
                SearchOutcome::Exhausted(stats)
            }
            SearchStatus::Searching => {
                debug!(expanded = stats.expanded, "search interrupted by budget");
                SearchOutcome::Interrupted(stats)
            }
        }
    }
}

/// Search `board` from `start` with the cost-grid heuristic.
#[tracing::instrument(level = "debug", skip(board), fields(size = board.size()))]
pub fn solve(board: &Board, start: Position) -> Result<SearchOutcome> {
    Ok(Search::new(board, start)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(outcome: &SearchOutcome) -> Vec<(i32, i32)> {
        outcome
            .solution()
            .unwrap()
            .path
            .positions()
            .map(|p| (p.row, p.col))
            .collect()
    }

    #[test]
    fn test_single_leap_to_exit() {
        let board = Board::new(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
        let outcome = solve(&board, Position::new(1, 1)).unwrap();

        assert_eq!(path_of(&outcome), vec![(1, 1), (0, 0)]);
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.path.jumps(), 1);
        assert_eq!(solution.stats.expanded, 1);
        assert_eq!(solution.stats.discovered, 9);
    }

    #[test]
    fn test_start_on_exit() {
        let board = Board::new(vec![vec![0, 1], vec![1, 1]]).unwrap();
        let outcome = solve(&board, Position::new(0, 0)).unwrap();
        assert_eq!(path_of(&outcome), vec![(0, 0)]);
        assert_eq!(outcome.stats().expanded, 0);
    }

    #[test]
    fn test_invalid_start() {
        let board = Board::new(vec![vec![-1, 0], vec![0, 1]]).unwrap();
        assert!(matches!(
            solve(&board, Position::new(0, 0)),
            Err(Error::InvalidStart(p)) if p == Position::new(0, 0)
        ));
        assert!(matches!(
            solve(&board, Position::new(4, 0)),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_no_exit_is_exhausted() {
        let board = Board::new(vec![vec![1, 1], vec![1, 1]]).unwrap();
        let outcome = solve(&board, Position::new(0, 0)).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
        assert_eq!(outcome.stats().expanded, 4);
    }

    #[test]
    fn test_unreachable_exit_is_exhausted() {
        let board = Board::new(vec![vec![1, -1, 0], vec![-1, -1, -1], vec![-1, -1, -1]]).unwrap();
        let outcome = solve(&board, Position::new(0, 0)).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
        assert_eq!(outcome.stats().expanded, 1);
    }

    #[test]
    fn test_blocked_exit_is_exhausted() {
        let board = Board::new(vec![vec![2, 0, 0], vec![-1, -1, -1], vec![-1, -1, -1]]).unwrap();
        let outcome = solve(&board, Position::new(0, 0)).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
    }

    #[test]
    fn test_huge_jump_is_exhausted() {
        let board = Board::new(vec![vec![0, 0], vec![i32::MAX, 0]]).unwrap();
        let outcome = solve(&board, Position::new(1, 0)).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
        assert_eq!(outcome.stats().expanded, 1);
    }

    #[test]
    fn test_step_status_transitions() {
        let board = Board::new(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
        let mut search = Search::new(&board, Position::new(1, 1)).unwrap();
        assert_eq!(search.status(), SearchStatus::Searching);
        assert_eq!(search.context().frontier_len(), 1);

        assert_eq!(search.step(), Step::Expanded(NodeId(0)));
        assert_eq!(search.context().frontier_len(), 8);
        assert!(search.context().is_explored(Position::new(1, 1)));

        assert_eq!(search.step(), Step::Found(NodeId(1)));
        assert_eq!(search.status(), SearchStatus::Succeeded(NodeId(1)));
        assert_eq!(search.step(), Step::Found(NodeId(1)));
    }

    #[test]
    fn test_rediscovery_keeps_first_parent() {
        let board = Board::new(vec![vec![1, 1, -1], vec![1, 1, -1], vec![-1, -1, 0]]).unwrap();
        let mut search = Search::new(&board, Position::new(0, 0)).unwrap();
        while let Step::Expanded(_) = search.step() {}

        let ctx = search.context();
        // (0, 1) is a neighbor of both the root and (1, 1)
        assert_eq!(ctx.state_at(Position::new(0, 1)).unwrap().parent, Some(NodeId(0)));
        assert_eq!(ctx.score(Position::new(1, 1)), Estimate::Scored(1));
        assert_eq!(ctx.score(Position::new(2, 0)), Estimate::Unscored);

        let outcome = search.run();
        assert_eq!(path_of(&outcome), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_budget_interrupts() {
        let board = Board::new(vec![vec![1, 1], vec![1, 1]]).unwrap();
        let budget = SearchBudget {
            max_expansions: Some(2),
            timeout: None,
        };
        let outcome = Search::new(&board, Position::new(0, 0))
            .unwrap()
            .run_bounded(&budget);
        assert!(matches!(outcome, SearchOutcome::Interrupted(_)));
        assert_eq!(outcome.stats().expanded, 2);

        let outcome = Search::new(&board, Position::new(0, 0))
            .unwrap()
            .run_bounded(&SearchBudget::default());
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
    }

    #[test]
    fn test_zero_budget_does_no_work() {
        let board = Board::new(vec![vec![1, 1], vec![1, 1]]).unwrap();

        let no_expansions = SearchBudget {
            max_expansions: Some(0),
            timeout: None,
        };
        let outcome = Search::new(&board, Position::new(0, 0))
            .unwrap()
            .run_bounded(&no_expansions);
        assert!(matches!(outcome, SearchOutcome::Interrupted(_)));
        assert_eq!(outcome.stats().expanded, 0);
        assert_eq!(outcome.stats().discovered, 1);

        let no_time = SearchBudget {
            max_expansions: None,
            timeout: Some(Duration::ZERO),
        };
        let outcome = Search::new(&board, Position::new(0, 0))
            .unwrap()
            .run_bounded(&no_time);
        assert!(matches!(outcome, SearchOutcome::Interrupted(_)));
        assert_eq!(outcome.stats().expanded, 0);
    }

    #[test]
    fn test_reconstruct_walks_parents() {
        let board = Board::new(vec![vec![1, 1, -1], vec![1, 1, -1], vec![-1, -1, 0]]).unwrap();
        let mut search = Search::new(&board, Position::new(0, 0)).unwrap();
        let goal = loop {
            match search.step() {
                Step::Found(goal) => break goal,
                Step::Expanded(_) => {}
                Step::Exhausted => panic!("expected an exit"),
            }
        };

        let path = reconstruct(search.context(), goal).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.states()[0].parent, None);
        assert!(path.states()[2].is_exit());

        assert!(search.context().state(NodeId(99)).is_none());
        assert!(reconstruct(search.context(), NodeId(99)).is_none());
    }
}
