//! Fractional sort weights.
//!
//! Items carry an `f64` weight and are displayed in ascending weight order.
//! Moving one item computes a single new weight between its future
//! neighbors, so no other item is touched:
//!
//! ```text
//!   before:  a(1.0)  b(2.0)  c(3.0)          move c to rank 1
//!   others:  a(1.0)  b(2.0)                  c excluded
//!   result:  a(1.0)  c(1.5)  b(2.0)          midpoint of a and b
//! ```
//!
//! Repeated bisection at one boundary halves the gap every time, so after
//! roughly fifty moves into the same slot two weights collapse to the same
//! float. That case is reported as [`WeightError::DegenerateOrdering`] and
//! the caller is expected to renumber (see [`crate::renumber`]).
//!
//! Nothing here serializes access. A caller that lets two reorders run
//! against the same collection must make the second one read the weights
//! written by the first, or both may compute the same midpoint.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::config::WeightConfig;
use crate::error::WeightError;

/// Anything ordered by a sort weight.
pub trait Weighted {
    fn sort_weight(&self) -> f64;
}

/// A weighted item whose weight can be rewritten.
pub trait WeightedMut: Weighted {
    fn set_sort_weight(&mut self, weight: f64);
}

impl Weighted for f64 {
    fn sort_weight(&self) -> f64 {
        *self
    }
}

impl WeightedMut for f64 {
    fn set_sort_weight(&mut self, weight: f64) {
        *self = weight;
    }
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn sort_weight(&self) -> f64 {
        (**self).sort_weight()
    }
}

/// Order two weights. Equal values (including `-0.0` and `0.0`) compare
/// equal so a stable sort keeps their input order.
pub(crate) fn compare(a: f64, b: f64) -> Ordering {
    if a == b { Ordering::Equal } else { a.total_cmp(&b) }
}

/// Midpoint that cannot overflow for large weights of either sign.
fn midpoint(a: f64, b: f64) -> f64 {
    a / 2.0 + b / 2.0
}

/// A copy of `items` sorted ascending by weight. Ties keep input order.
pub fn sorted_by_weight<T: Weighted>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| compare(a.sort_weight(), b.sort_weight()));
    sorted
}

/// Compute a weight placing a new or moved item at rank `target` among
/// `items`, using the default step and baseline.
///
/// `items` must not contain the item being moved. `target == items.len()`
/// appends after the last item.
///
/// ```
/// use blurb::weight::compute_weight;
///
/// let weights = [1.0, 2.0, 3.0];
/// assert_eq!(compute_weight(&weights, 0).unwrap(), 0.0);
/// assert_eq!(compute_weight(&weights, 3).unwrap(), 4.0);
/// assert_eq!(compute_weight(&[1.0, 3.0], 1).unwrap(), 2.0);
/// assert_eq!(compute_weight::<f64>(&[], 0).unwrap(), 0.0);
/// ```
pub fn compute_weight<T: Weighted>(items: &[T], target: usize) -> Result<f64, WeightError> {
    compute_weight_with(items, target, &WeightConfig::default())
}

/// Like [`compute_weight`], with the step and baseline taken from `config`.
pub fn compute_weight_with<T: Weighted>(
    items: &[T],
    target: usize,
    config: &WeightConfig,
) -> Result<f64, WeightError> {
    let non_finite = items
        .iter()
        .map(|item| item.sort_weight())
        .enumerate()
        .find(|(_, weight)| !weight.is_finite());
    if let Some((index, weight)) = non_finite {
        return Err(WeightError::NonFiniteWeight { index, weight });
    }

    let len = items.len();
    if target > len {
        return Err(WeightError::TargetOutOfRange { target, len });
    }
    if len == 0 {
        return Ok(config.baseline);
    }

    let sorted = sorted_by_weight(items);

    let (weight, neighbor, separated) = if target == 0 {
        let first = sorted[0].sort_weight();
        let weight = first - config.step;
        (weight, first, weight < first)
    } else if target == len {
        let last = sorted[len - 1].sort_weight();
        let weight = last + config.step;
        (weight, last, weight > last)
    } else {
        let prev = sorted[target - 1].sort_weight();
        let next = sorted[target].sort_weight();
        let weight = midpoint(prev, next);
        let neighbor = if weight <= prev { prev } else { next };
        (weight, neighbor, prev < weight && weight < next)
    };

    if !separated || !weight.is_finite() {
        tracing::warn!(
            target_index = target,
            len,
            weight,
            neighbor,
            "sort weight collides with neighbor; collection needs renumbering"
        );
        return Err(WeightError::DegenerateOrdering { weight, neighbor });
    }

    tracing::trace!(target_index = target, len, weight, "computed sort weight");
    Ok(weight)
}

/// Pairs of input positions `(first, later)` whose finite weights are equal.
/// Each later duplicate is paired with the first position holding its weight.
pub fn find_duplicate_weights<T: Weighted>(items: &[T]) -> Vec<(usize, usize)> {
    let mut seen: FxHashMap<u64, usize> = FxHashMap::default();
    let mut duplicates = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let weight = item.sort_weight();
        if !weight.is_finite() {
            continue;
        }
        // Fold -0.0 into 0.0 so both hash alike.
        let key = if weight == 0.0 { 0.0f64.to_bits() } else { weight.to_bits() };
        match seen.get(&key) {
            Some(&first) => duplicates.push((first, index)),
            None => {
                seen.insert(key, index);
            }
        }
    }
    duplicates
}
