//! Blurb - ordered content tiles with fractional sort weights.
//!
//! # Quick Start
//!
//! ```
//! use blurb::weight::compute_weight;
//!
//! // Weights of every item except the one being moved.
//! let others = [1.0, 2.0, 3.0];
//!
//! assert_eq!(compute_weight(&others, 0).unwrap(), 0.0); // before the first
//! assert_eq!(compute_weight(&others, 1).unwrap(), 1.5); // between 1 and 2
//! assert_eq!(compute_weight(&others, 3).unwrap(), 4.0); // after the last
//! ```
//!
//! The [`board`] and [`intent`] modules build a tile board on top of this.

pub mod blurb;
pub mod board;
pub mod config;
pub mod error;
pub mod id;
pub mod intent;
pub mod renumber;
pub mod weight;

pub use error::{BoardError, ConfigError, WeightError};
pub use weight::{Weighted, WeightedMut, compute_weight};
