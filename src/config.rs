//! Configuration for weight assignment and board limits.
//!
//! ```
//! use blurb::config::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     [weight]
//!     step = 10.0
//!
//!     [board]
//!     max_blurbs = 6
//! "#).unwrap();
//!
//! assert_eq!(config.weight.step, 10.0);
//! assert_eq!(config.board.max_blurbs, 6);
//! assert_eq!(config.board.min_blurbs, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_STEP: f64 = 1.0;
pub const DEFAULT_BASELINE: f64 = 0.0;
pub const DEFAULT_SPACING: f64 = 1.0;
pub const DEFAULT_MIN_BLURBS: usize = 1;
pub const DEFAULT_MAX_BLURBS: usize = 4;
pub const DEFAULT_COUNT: usize = 1;

/// Weight assignment parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Distance placed before the first or after the last item.
    pub step: f64,
    /// Weight given to the only item of an otherwise empty collection.
    pub baseline: f64,
    /// Gap between consecutive weights after renumbering.
    pub spacing: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            baseline: DEFAULT_BASELINE,
            spacing: DEFAULT_SPACING,
        }
    }
}

/// Board size limits and maintenance policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub min_blurbs: usize,
    pub max_blurbs: usize,
    /// Number of blurbs a fresh board starts with.
    pub default_count: usize,
    /// Renumber and retry once when a move hits a degenerate ordering.
    pub auto_renumber: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_blurbs: DEFAULT_MIN_BLURBS,
            max_blurbs: DEFAULT_MAX_BLURBS,
            default_count: DEFAULT_COUNT,
            auto_renumber: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weight: WeightConfig,
    pub board: BoardConfig,
}

impl Config {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weight.validate()?;
        self.board.validate()
    }
}

impl WeightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(invalid(format!("weight.step must be positive, got {}", self.step)));
        }
        if !self.baseline.is_finite() {
            return Err(invalid(format!("weight.baseline must be finite, got {}", self.baseline)));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(invalid(format!("weight.spacing must be positive, got {}", self.spacing)));
        }
        Ok(())
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_blurbs > self.max_blurbs {
            return Err(invalid(format!(
                "board.min_blurbs ({}) exceeds board.max_blurbs ({})",
                self.min_blurbs, self.max_blurbs
            )));
        }
        if self.default_count < self.min_blurbs || self.default_count > self.max_blurbs {
            return Err(invalid(format!(
                "board.default_count ({}) outside [{}, {}]",
                self.default_count, self.min_blurbs, self.max_blurbs
            )));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}
