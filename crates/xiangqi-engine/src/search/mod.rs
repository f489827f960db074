//! Search algorithms and move ordering.

pub mod alphabeta;
pub mod control;
pub mod heuristics;
pub mod ordering;
pub mod tt;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};
use xiangqi_core::{Move, Position, WIN_VALUE};

use crate::config::{EngineConfig, SearchLimits};
use alphabeta::SearchContext;
use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use tt::TranspositionTable;

/// Hard ceiling on distance from the root, in plies.
pub const LIMIT_DEPTH: usize = 64;

/// Extra depth reduction for the null-move search.
pub const NULL_DEPTH: i32 = 2;

/// Default amplitude of the root score jitter.
pub const RANDOMNESS: i32 = 8;

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move at the deepest completed iteration, `None` when the side
    /// to move has no legal move.
    pub best_move: Option<Move>,
    /// Score of that move for the side to move, without jitter.
    pub score: i32,
    /// Deepest completed iteration.
    pub depth: i32,
    /// Nodes visited across all iterations.
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Thousands of nodes per second.
    pub fn knps(&self) -> u64 {
        let millis = self.elapsed.as_millis() as u64;
        if millis == 0 { 0 } else { self.nodes / millis }
    }
}

/// Iterative-deepening searcher owning its table and heuristics.
///
/// Nothing is shared between searchers, so independent games each need
/// their own.
pub struct Searcher {
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    rng: SmallRng,
    randomness: i32,
}

impl Searcher {
    /// Create a searcher with `1 << hash_level` table slots.
    ///
    /// Without a seed the jitter is drawn from OS entropy.
    pub fn new(hash_level: u32, randomness: i32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            tt: TranspositionTable::new(hash_level),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            rng,
            randomness: randomness.max(0),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.hash_level, config.randomness, config.seed)
    }

    /// Run iterative deepening on `pos` until a limit is hit.
    ///
    /// The position is restored before returning. Iterations stop at the
    /// depth cap, when the time budget has passed, when the score shows a
    /// decided game, or when no alternative to the best move survives a
    /// narrow check. An iteration interrupted by the stop flag or the hard
    /// limit is discarded.
    pub fn search(
        &mut self,
        pos: &mut Position,
        limits: &SearchLimits,
        control: &SearchControl,
    ) -> SearchResult {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
        pos.reset_distance();

        let mut ctx = SearchContext {
            nodes: 0,
            tt: &mut self.tt,
            killers: &mut self.killers,
            history: &mut self.history,
            control,
            rng: &mut self.rng,
            randomness: self.randomness,
            root_best: Move::NULL,
        };

        let mut completed_move = None;
        let mut completed_score = 0;
        let mut completed_depth = 0;
        let max_depth = limits.max_depth.clamp(1, LIMIT_DEPTH as i32);

        for depth in 1..=max_depth {
            if control.is_stopped() {
                break;
            }

            let outcome = ctx.search_root(pos, depth);
            if control.is_stopped() {
                break;
            }

            completed_move = (!ctx.root_best.is_null()).then_some(ctx.root_best);
            completed_score = outcome.raw;
            completed_depth = depth;
            debug!(
                depth,
                score = outcome.raw,
                nodes = ctx.nodes,
                best = %ctx.root_best,
                "iteration complete"
            );

            if control.should_stop_iterating() {
                break;
            }
            if outcome.raw.abs() > WIN_VALUE {
                break;
            }
            if ctx.search_unique(pos, 1 - WIN_VALUE, depth) {
                break;
            }
        }

        let nodes = ctx.nodes;
        let partial = ctx.root_best;

        // Interrupted before any iteration finished: fall back to whatever
        // the root had found, else any legal move.
        if completed_move.is_none() && completed_depth == 0 {
            completed_move = if partial.is_null() {
                pos.legal_moves().first().copied()
            } else {
                Some(partial)
            };
            if completed_move.is_some() {
                completed_score = pos.evaluate();
            } else {
                completed_score = pos.mate_value();
            }
        }

        let result = SearchResult {
            best_move: completed_move,
            score: completed_score,
            depth: completed_depth,
            nodes,
            elapsed: control.elapsed(),
        };
        match result.best_move {
            Some(mv) => info!(
                best = %mv,
                score = result.score,
                depth = result.depth,
                nodes = result.nodes,
                elapsed_ms = result.elapsed.as_millis() as u64,
                knps = result.knps(),
                "search finished"
            ),
            None => warn!(fen = %pos.snapshot(), "no legal move for the side to move"),
        }
        result
    }
}
