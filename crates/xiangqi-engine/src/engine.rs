//! Host-facing adapter: snapshots in, moves in `(row, col)` form out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};
use xiangqi_core::{BoardSnapshot, Move, Position};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::search::{SearchResult, Searcher};

/// A move in external board coordinates: `(row, col)` with row 0 on
/// Black's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveCoords {
    pub from: (usize, usize),
    pub to: (usize, usize),
}

impl From<Move> for MoveCoords {
    fn from(mv: Move) -> Self {
        let (from, to) = mv.coords();
        MoveCoords { from, to }
    }
}

/// The engine's answer for one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// `None` when the side to move has no legal move.
    pub best_move: Option<MoveCoords>,
    pub result: SearchResult,
}

impl Analysis {
    fn from_result(result: SearchResult) -> Self {
        Analysis {
            best_move: result.best_move.map(MoveCoords::from),
            result,
        }
    }
}

/// Game state of a snapshot from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// In check with no legal move.
    Checkmated,
    /// No legal move while not in check; a loss in Xiangqi.
    Stalemated,
    /// Neither side has a rook, knight or cannon.
    InsufficientMaterial,
}

/// Xiangqi engine: each call loads a fresh position and runs a search.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Engine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Search `snapshot` and return the best move for the side to move.
    pub fn best_move(&self, snapshot: &BoardSnapshot) -> Result<Analysis, EngineError> {
        self.best_move_after(snapshot, &[])
    }

    /// Replay `moves` from `snapshot`, then search.
    ///
    /// The replayed moves stay on the history stack, so repetitions and
    /// perpetual checks spanning them are recognized.
    pub fn best_move_after(
        &self,
        snapshot: &BoardSnapshot,
        moves: &[Move],
    ) -> Result<Analysis, EngineError> {
        let mut pos = self.load(snapshot, moves)?;
        let stop = Arc::new(AtomicBool::new(false));
        Ok(run_search(&self.config, &mut pos, stop))
    }

    /// Run the search on a background thread.
    ///
    /// The snapshot is validated before the thread starts.
    pub fn spawn(&self, snapshot: &BoardSnapshot) -> Result<SearchHandle, EngineError> {
        let mut pos = self.load(snapshot, &[])?;
        let config = self.config;
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || run_search(&config, &mut pos, worker_stop));
        Ok(SearchHandle { stop, handle })
    }

    /// Classify the snapshot without searching.
    pub fn status(&self, snapshot: &BoardSnapshot) -> Result<GameStatus, EngineError> {
        let mut pos = Position::from_snapshot(snapshot)?;
        let status = if pos.is_mate() {
            if pos.in_check() {
                GameStatus::Checkmated
            } else {
                GameStatus::Stalemated
            }
        } else if pos.insufficient_material() {
            GameStatus::InsufficientMaterial
        } else {
            GameStatus::Ongoing
        };
        Ok(status)
    }

    fn load(&self, snapshot: &BoardSnapshot, moves: &[Move]) -> Result<Position, EngineError> {
        let mut pos = Position::from_snapshot(snapshot)?;
        for &mv in moves {
            pos.play(mv)?;
        }
        debug!(
            fen = %snapshot,
            replayed = moves.len(),
            max_depth = self.config.max_depth,
            budget_ms = self.config.time_budget.as_millis() as u64,
            "search requested"
        );
        Ok(pos)
    }
}

fn run_search(config: &EngineConfig, pos: &mut Position, stop: Arc<AtomicBool>) -> Analysis {
    let limits = config.limits();
    let control = limits.control(stop);
    let mut searcher = Searcher::from_config(config);
    Analysis::from_result(searcher.search(pos, &limits, &control))
}

/// A search running on a background thread.
pub struct SearchHandle {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Analysis>,
}

impl SearchHandle {
    /// Ask the search to stop; the last completed iteration is kept.
    pub fn cancel(&self) {
        info!("search cancelled");
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the search to finish.
    pub fn join(self) -> Result<Analysis, EngineError> {
        self.handle.join().map_err(|_| EngineError::WorkerPanicked)
    }
}
