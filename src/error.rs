//! Error types for weight assignment, board editing and configuration.

use crate::id::BlurbId;

/// Errors from computing a sort weight.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("target index {target} out of range for {len} items")]
    TargetOutOfRange { target: usize, len: usize },

    #[error("item {index} has non-finite weight {weight}")]
    NonFiniteWeight { index: usize, weight: f64 },

    /// The computed weight would collide with (or fail to separate from) a
    /// neighbor. The collection should be renumbered.
    #[error("degenerate ordering: weight {weight} does not separate from neighbor {neighbor}")]
    DegenerateOrdering { weight: f64, neighbor: f64 },
}

impl WeightError {
    /// True for errors caused by bad caller input rather than exhausted precision.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            WeightError::TargetOutOfRange { .. } | WeightError::NonFiniteWeight { .. }
        )
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, WeightError::DegenerateOrdering { .. })
    }
}

/// Errors from board operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("no blurb with id {id}")]
    UnknownBlurb { id: BlurbId },

    #[error("board is full: at most {max} blurbs")]
    CapacityExceeded { max: usize },

    #[error("board needs at least {min} blurbs")]
    BelowMinimum { min: usize },

    #[error("blurb count {count} outside [{min}, {max}]")]
    CountOutOfRange { count: usize, min: usize, max: usize },

    #[error("invalid color: {value}")]
    InvalidColor { value: String },

    #[error("stale snapshot: board changed since it was read")]
    StaleSnapshot,

    #[error(transparent)]
    Weight(#[from] WeightError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}
