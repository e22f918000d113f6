//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with horizon-effect mitigation between depths
//! - Negamax alpha-beta with a pass move and a per-node deadline check
//! - Quiescence search over attacks with a flee estimate
//! - Move ordering (TT move, killers, history) by partial selection
//! - Transposition table tagged by epoch and search mode
//! - A narrow, deeper "chase" search for repeated flights

mod chase;
mod constants;
mod iterative;
pub mod log;
mod negamax;
mod params;
mod quiescence;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sync::StopFlag;
use crate::tt::{SearchMode, TranspositionTable};

use super::view::SearchView;
use super::{Board, Color, Move, GRID_SIZE, MAX_PLY};
pub use constants::{INFINITY, TRAPPED_SCORE};
pub use log::{NodeTrace, SearchInfo, SearchLogger, StdoutLogger};
pub use params::SearchParams;

pub(crate) use chase::ChaseFocus;

/// Default transposition table size in MB
pub const DEFAULT_TT_MB: usize = 16;

/// The chosen move and how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    pub best_move: Move,
    /// Evaluation from the searching side's point of view.
    pub value: i32,
    /// Deepest fully completed depth the move was accepted at.
    pub depth: u32,
    pub nodes: u64,
    /// Whether a chase search supplied the move.
    pub chase: bool,
}

/// What the engine hands back for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchOutcome {
    Best(SearchResult),
    /// The side has no legal move and loses.
    Trapped,
}

impl SearchOutcome {
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        match self {
            SearchOutcome::Best(result) => Some(result.best_move),
            SearchOutcome::Trapped => None,
        }
    }
}

/// Raised when the deadline passes or the stop flag is set. Every frame
/// unmakes its move before passing it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchAborted;

/// Per-request settings.
#[derive(Clone)]
pub struct SearchConfig {
    pub max_depth: u32,
    /// Wall-clock budget; zero means no deadline.
    pub time_limit_ms: u64,
    pub tt_mb: usize,
    /// Send per-node traces to the logger.
    pub trace: bool,
    /// Seeds the tie-breaking noise on hidden piece values.
    pub seed: u64,
    pub params: SearchParams,
    pub logger: Option<Arc<dyn SearchLogger>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 24,
            time_limit_ms: 1000,
            tt_mb: DEFAULT_TT_MB,
            trace: false,
            seed: 0,
            params: SearchParams::default(),
            logger: None,
        }
    }
}

impl SearchConfig {
    /// Fixed-depth search without a deadline.
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth,
            time_limit_ms: 0,
            ..SearchConfig::default()
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("max_depth", &self.max_depth)
            .field("time_limit_ms", &self.time_limit_ms)
            .field("tt_mb", &self.tt_mb)
            .field("trace", &self.trace)
            .field("seed", &self.seed)
            .field("params", &self.params)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Statistics tracked during search
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub chase_searches: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }
}

pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[super::EMPTY_MOVE; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(super::EMPTY_MOVE, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(super::EMPTY_MOVE, |row| row[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    pub fn reset(&mut self) {
        for killers in &mut self.slots {
            *killers = [super::EMPTY_MOVE; 2];
        }
    }
}

/// Cutoff counts per (from, to) cell pair.
pub struct HistoryTable {
    entries: Box<[i32]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: vec![0; GRID_SIZE * GRID_SIZE].into_boxed_slice(),
        }
    }

    fn slot(mv: Move) -> usize {
        mv.from().index() * GRID_SIZE + mv.to().index()
    }

    #[must_use]
    pub fn score(&self, mv: Move) -> i32 {
        self.entries.get(Self::slot(mv)).copied().unwrap_or(0)
    }

    /// Reward a move that caused a beta cutoff
    pub fn update(&mut self, mv: Move, depth: u32) {
        if let Some(entry) = self.entries.get_mut(Self::slot(mv)) {
            let bonus = (depth * depth) as i32;
            *entry = entry.saturating_add(bonus);
        }
    }

    pub fn reset(&mut self) {
        self.entries.fill(0);
    }
}

/// Search state persisted across requests. The tables are only trusted
/// within one request: the epoch advances on every call.
pub struct SearchState {
    pub tt: TranspositionTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub epoch: u32,
    pub stats: SearchStats,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(DEFAULT_TT_MB)
    }
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            epoch: 0,
            stats: SearchStats::default(),
        }
    }

    /// Start a new request: older table entries become misses.
    pub fn begin_request(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.killers.reset();
        self.history.reset();
        self.stats.reset();
    }
}

/// Search context for a single request
pub(crate) struct SearchContext<'a> {
    pub(crate) view: SearchView,
    pub(crate) state: &'a mut SearchState,
    pub(crate) config: &'a SearchConfig,
    stop: &'a StopFlag,
    start: Instant,
    deadline: Option<Instant>,
    pub(crate) nodes: u64,
    pub(crate) mode: SearchMode,
    pub(crate) focus: Option<ChaseFocus>,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(
        view: SearchView,
        state: &'a mut SearchState,
        config: &'a SearchConfig,
        stop: &'a StopFlag,
    ) -> Self {
        Self::started_at(view, state, config, stop, Instant::now())
    }

    /// Context whose time budget runs from `start`, so work done before
    /// the search proper (building the view) is charged to the request.
    pub(crate) fn started_at(
        view: SearchView,
        state: &'a mut SearchState,
        config: &'a SearchConfig,
        stop: &'a StopFlag,
        start: Instant,
    ) -> Self {
        let deadline = (config.time_limit_ms > 0)
            .then(|| start + Duration::from_millis(config.time_limit_ms));
        SearchContext {
            view,
            state,
            config,
            stop,
            start,
            deadline,
            nodes: 0,
            mode: SearchMode::Broad,
            focus: None,
        }
    }

    /// Count a node and bail out once the request is over.
    #[inline]
    pub(crate) fn visit(&mut self) -> Result<(), SearchAborted> {
        if self.stop.is_stopped() || self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SearchAborted);
        }
        self.nodes += 1;
        Ok(())
    }

    fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    fn params(&self) -> &SearchParams {
        &self.config.params
    }
}

/// Pick a move for `side` on `board`.
///
/// Returns [`SearchOutcome::Trapped`] when `side` has no legal move. A
/// stopped flag or an expired deadline still yields a legal move: the best
/// one from the last completed depth, or the first legal one.
pub fn find_best_move(
    board: &Board,
    side: Color,
    state: &mut SearchState,
    config: &SearchConfig,
    stop: &StopFlag,
) -> SearchOutcome {
    let start = Instant::now();
    state.begin_request();
    let view = SearchView::build(board, side, &config.params, config.seed);
    let mut ctx = SearchContext::started_at(view, state, config, stop, start);
    let outcome = ctx.iterate();
    ctx.state.stats.nodes = ctx.nodes;
    match outcome {
        SearchOutcome::Best(result) => ::log::info!(
            "{side} plays {} (value {}, depth {}, nodes {}, chase {})",
            result.best_move,
            result.value,
            result.depth,
            result.nodes,
            result.chase
        ),
        SearchOutcome::Trapped => ::log::info!("{side} has no legal move"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn mv(from: &str, to: &str) -> Move {
        Move::new(from.parse::<Square>().unwrap(), to.parse::<Square>().unwrap())
    }

    #[test]
    fn killers_shift_on_new_move() {
        let mut killers = KillerTable::new();
        killers.update(3, mv("a1", "a2"));
        killers.update(3, mv("b1", "b2"));
        killers.update(3, mv("b1", "b2"));
        assert_eq!(killers.primary(3), mv("b1", "b2"));
        assert_eq!(killers.secondary(3), mv("a1", "a2"));
        assert_eq!(killers.primary(MAX_PLY + 1), Move::null());
    }

    #[test]
    fn history_accumulates_by_depth() {
        let mut history = HistoryTable::new();
        let m = mv("c3", "c4");
        history.update(m, 3);
        history.update(m, 2);
        assert_eq!(history.score(m), 13);
        history.reset();
        assert_eq!(history.score(m), 0);
    }

    #[test]
    fn begin_request_advances_epoch() {
        let mut state = SearchState::new(1);
        state.begin_request();
        state.begin_request();
        assert_eq!(state.epoch, 2);
    }
}
