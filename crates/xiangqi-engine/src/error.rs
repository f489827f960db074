//! Engine-level errors.

use xiangqi_core::{BoardError, MoveError, SnapshotError};

use crate::config::ConfigError;

/// Anything that can go wrong before or after a search.
///
/// The search itself never fails; these cover bad input and the
/// background worker.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The background search thread panicked.
    #[error("search worker panicked")]
    WorkerPanicked,
}
