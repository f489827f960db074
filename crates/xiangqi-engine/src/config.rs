//! Difficulty presets and engine configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::search::control::SearchControl;
use crate::search::tt::TranspositionTable;
use crate::search::{LIMIT_DEPTH, RANDOMNESS};

/// Errors from building an engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The difficulty name is not `easy`, `medium` or `hard`.
    #[error("unknown difficulty \"{name}\" (expected easy, medium or hard)")]
    UnknownDifficulty { name: String },
    #[error("search depth {depth} is outside 1..={}", LIMIT_DEPTH)]
    DepthOutOfRange { depth: i32 },
    #[error("hash level {level} exceeds {}", TranspositionTable::MAX_LEVEL)]
    HashLevelTooLarge { level: u32 },
}

/// Preset strength levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn max_depth(self) -> i32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 8,
            Difficulty::Hard => 10,
        }
    }

    pub const fn time_budget(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(800),
            Difficulty::Medium => Duration::from_millis(2000),
            Difficulty::Hard => Duration::from_millis(4000),
        }
    }

    /// Transposition table size as a power of two.
    pub const fn hash_level(self) -> u32 {
        match self {
            Difficulty::Easy => 16,
            Difficulty::Medium => 18,
            Difficulty::Hard => 19,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownDifficulty {
                name: s.to_string(),
            })
    }
}

/// Depth and time limits of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: i32,
    /// No new iteration starts once this much time has passed.
    pub time_budget: Duration,
    /// Abort the running iteration after this long.
    pub hard_limit: Option<Duration>,
}

impl SearchLimits {
    /// Start the clock for these limits.
    pub fn control(&self, stopped: Arc<AtomicBool>) -> SearchControl {
        SearchControl::new_timed(stopped, self.time_budget, self.hard_limit)
    }
}

/// Everything an [`Engine`](crate::Engine) needs to run searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_depth: i32,
    pub time_budget: Duration,
    pub hard_limit: Option<Duration>,
    pub hash_level: u32,
    /// Amplitude of the root jitter; 0 makes the choice deterministic.
    pub randomness: i32,
    /// Jitter seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            max_depth: difficulty.max_depth(),
            time_budget: difficulty.time_budget(),
            hard_limit: None,
            hash_level: difficulty.hash_level(),
            randomness: RANDOMNESS,
            seed: None,
        }
    }

    pub fn with_max_depth(mut self, depth: i32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_hard_limit(mut self, limit: Option<Duration>) -> Self {
        self.hard_limit = limit;
        self
    }

    pub fn with_hash_level(mut self, level: u32) -> Self {
        self.hash_level = level;
        self
    }

    pub fn with_randomness(mut self, randomness: i32) -> Self {
        self.randomness = randomness;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth,
            time_budget: self.time_budget,
            hard_limit: self.hard_limit,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=LIMIT_DEPTH as i32).contains(&self.max_depth) {
            return Err(ConfigError::DepthOutOfRange {
                depth: self.max_depth,
            });
        }
        if self.hash_level > TranspositionTable::MAX_LEVEL {
            return Err(ConfigError::HashLevelTooLarge {
                level: self.hash_level,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}
