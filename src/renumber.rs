//! Full renumbering of sort weights.
//!
//! Fractional insertion never touches other items, which is what lets it
//! run out of float precision. Renumbering is the periodic maintenance
//! pass: every item gets an evenly spaced weight in its current order.

use std::cmp::Ordering;

use crate::weight::{Weighted, WeightedMut, compare};

/// Rewrite every weight to `spacing, 2 * spacing, ...` in ascending weight
/// order. Ties keep input order. Non-finite weights go last, in input order.
pub fn renumber<T: WeightedMut>(items: &mut [T], spacing: f64) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| finite_first(items[a].sort_weight(), items[b].sort_weight()));

    for (rank, &index) in order.iter().enumerate() {
        items[index].set_sort_weight((rank + 1) as f64 * spacing);
    }

    tracing::debug!(count = items.len(), spacing, "renumbered sort weights");
}

/// True when the weights need a renumbering pass: some weight is not
/// finite, two weights are equal, or two neighbors are closer than `min_gap`.
pub fn needs_renumber<T: Weighted>(items: &[T], min_gap: f64) -> bool {
    let mut weights = Vec::with_capacity(items.len());
    for item in items {
        let weight = item.sort_weight();
        if !weight.is_finite() {
            return true;
        }
        weights.push(weight);
    }
    weights.sort_by(|a, b| compare(*a, *b));
    weights.windows(2).any(|pair| {
        let gap = pair[1] - pair[0];
        gap == 0.0 || gap < min_gap
    })
}

fn finite_first(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => compare(a, b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::compute_weight;

    #[test]
    fn keeps_order() {
        let mut weights = vec![0.5, -3.0, 7.25, 0.75];
        renumber(&mut weights, 1.0);
        assert_eq!(weights, vec![2.0, 1.0, 4.0, 3.0]);
    }

    #[test]
    fn custom_spacing() {
        let mut weights = vec![3.0, 1.0, 2.0];
        renumber(&mut weights, 10.0);
        assert_eq!(weights, vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut weights = vec![1.0, 1.0, 0.0, 1.0];
        renumber(&mut weights, 1.0);
        assert_eq!(weights, vec![2.0, 3.0, 1.0, 4.0]);
    }

    #[test]
    fn non_finite_goes_last() {
        let mut weights = vec![f64::NAN, 2.0, f64::NEG_INFINITY, 1.0];
        renumber(&mut weights, 1.0);
        assert_eq!(weights, vec![3.0, 2.0, 4.0, 1.0]);
    }

    #[test]
    fn empty_is_fine() {
        let mut weights: Vec<f64> = Vec::new();
        renumber(&mut weights, 1.0);
        assert!(weights.is_empty());
    }

    #[test]
    fn detects_need() {
        assert!(!needs_renumber(&[1.0, 2.0, 3.0], 0.5));
        assert!(needs_renumber(&[1.0, 1.25, 3.0], 0.5));
        assert!(needs_renumber(&[1.0, 1.0], 0.0));
        assert!(needs_renumber(&[1.0, f64::NAN], 0.0));
        assert!(!needs_renumber::<f64>(&[], 1.0));
    }

    #[test]
    fn unblocks_degenerate_slot() {
        let mut weights = vec![1.0, 1.0 + f64::EPSILON];
        assert!(compute_weight(&weights, 1).unwrap_err().is_degenerate());

        renumber(&mut weights, 1.0);
        assert_eq!(compute_weight(&weights, 1), Ok(1.5));
    }
}
