//! Search engine and host adapter for Xiangqi.

pub mod config;
pub mod engine;
pub mod error;
pub mod search;

pub use config::{ConfigError, Difficulty, EngineConfig, SearchLimits};
pub use engine::{Analysis, Engine, GameStatus, MoveCoords, SearchHandle};
pub use error::EngineError;
pub use search::control::SearchControl;
pub use search::{LIMIT_DEPTH, SearchResult, Searcher};
