//! A board of blurbs ordered by sort weight.
//!
//! Blurbs are stored in insertion order; the display order is always the
//! weight order. Every reorder computes one new weight for the moved blurb
//! with [`compute_weight_with`], leaving the rest of the board untouched.
//!
//! ```
//! use blurb::board::Board;
//! use blurb::config::{BoardConfig, WeightConfig};
//!
//! let config = BoardConfig { default_count: 3, ..BoardConfig::default() };
//! let mut board = Board::new(config, WeightConfig::default()).unwrap();
//!
//! let last = board.sorted()[2].id.clone();
//! board.move_to(&last, 0).unwrap();
//! assert_eq!(board.sorted()[0].id, last);
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::blurb::{Blurb, BlurbEdit, LayoutType, TileSize};
use crate::config::{BoardConfig, WeightConfig};
use crate::error::{BoardError, WeightError};
use crate::id::BlurbId;
use crate::renumber::{needs_renumber, renumber};
use crate::weight::{compute_weight_with, find_duplicate_weights, sorted_by_weight};

/// Boards up to this size live inline.
pub const INLINE_BLURBS: usize = 4;

/// The persisted shape of a board. Older bags keep the tiles under
/// `containers` and store `containerCount` next to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardProperties {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub layout: LayoutType,
    #[serde(default)]
    pub tile_size: TileSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_count: Option<usize>,
    #[serde(default, alias = "containers")]
    pub blurbs: Vec<Blurb>,
}

/// A digest of the board's ordering state: every id with its weight, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision(pub [u8; 32]);

#[derive(Debug, Clone)]
pub struct Board {
    pub description: String,
    pub layout: LayoutType,
    pub tile_size: TileSize,
    blurbs: SmallVec<[Blurb; INLINE_BLURBS]>,
    config: BoardConfig,
    weights: WeightConfig,
}

impl Board {
    /// A fresh board seeded with `config.default_count` default blurbs.
    pub fn new(config: BoardConfig, weights: WeightConfig) -> Result<Board, BoardError> {
        config.validate()?;
        weights.validate()?;
        let mut board = Board {
            description: String::new(),
            layout: LayoutType::default(),
            tile_size: TileSize::default(),
            blurbs: SmallVec::new(),
            config,
            weights,
        };
        for number in 1..=board.config.default_count {
            let weight = number as f64 * board.weights.spacing;
            board.blurbs.push(Blurb::new(number, weight));
        }
        Ok(board)
    }

    /// Adopt persisted blurbs. Colliding ids are regenerated, broken weights
    /// (missing, non-finite or duplicated) are repaired by renumbering the
    /// whole board, and the board is padded with defaults up to
    /// `containerCount` or `min_blurbs`.
    pub fn from_properties(
        props: BoardProperties,
        config: BoardConfig,
        weights: WeightConfig,
    ) -> Result<Board, BoardError> {
        config.validate()?;
        weights.validate()?;
        let mut board = Board {
            description: props.description,
            layout: props.layout,
            tile_size: props.tile_size,
            blurbs: props.blurbs.into_iter().collect(),
            config,
            weights,
        };

        if board.blurbs.len() > board.config.max_blurbs {
            tracing::warn!(
                count = board.blurbs.len(),
                max = board.config.max_blurbs,
                "persisted board holds more blurbs than allowed"
            );
        }

        let mut seen: FxHashSet<BlurbId> = FxHashSet::default();
        for blurb in board.blurbs.iter_mut() {
            while !seen.insert(blurb.id.clone()) {
                let fresh = BlurbId::generate();
                tracing::warn!(old = %blurb.id, new = %fresh, "duplicate blurb id; regenerated");
                blurb.id = fresh;
            }
        }

        if needs_renumber(&board.blurbs, 0.0) {
            let duplicates = find_duplicate_weights(&board.blurbs).len();
            tracing::warn!(
                count = board.blurbs.len(),
                duplicates,
                "persisted sort weights are broken; renumbering"
            );
            board.renumber();
        }

        let wanted = props
            .container_count
            .unwrap_or(0)
            .max(board.config.min_blurbs)
            .min(board.config.max_blurbs);
        while board.blurbs.len() < wanted {
            board.add()?;
        }
        Ok(board)
    }

    pub fn from_json(json: &str, config: BoardConfig, weights: WeightConfig) -> Result<Board, BoardError> {
        let props: BoardProperties = serde_json::from_str(json)?;
        Board::from_properties(props, config, weights)
    }

    pub fn properties(&self) -> BoardProperties {
        BoardProperties {
            description: self.description.clone(),
            layout: self.layout,
            tile_size: self.tile_size,
            container_count: Some(self.blurbs.len()),
            blurbs: self.blurbs.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string(&self.properties())?)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.blurbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blurbs.is_empty()
    }

    /// Blurbs in display order.
    pub fn sorted(&self) -> Vec<&Blurb> {
        sorted_by_weight(&self.blurbs)
    }

    pub fn get(&self, id: &BlurbId) -> Option<&Blurb> {
        self.blurbs.iter().find(|blurb| &blurb.id == id)
    }

    /// Zero-based display position of a blurb.
    pub fn rank_of(&self, id: &BlurbId) -> Option<usize> {
        self.sorted().iter().position(|blurb| &blurb.id == id)
    }

    fn index_of(&self, id: &BlurbId) -> Result<usize, BoardError> {
        self.blurbs
            .iter()
            .position(|blurb| &blurb.id == id)
            .ok_or_else(|| BoardError::UnknownBlurb { id: id.clone() })
    }

    /// Append a default blurb after the last one.
    pub fn add(&mut self) -> Result<&Blurb, BoardError> {
        if self.blurbs.len() >= self.config.max_blurbs {
            return Err(BoardError::CapacityExceeded {
                max: self.config.max_blurbs,
            });
        }
        let weight = self.place(None, self.blurbs.len())?;
        let blurb = Blurb::new(self.blurbs.len() + 1, weight);
        tracing::debug!(id = %blurb.id, weight, "added blurb");
        self.blurbs.push(blurb);
        Ok(&self.blurbs[self.blurbs.len() - 1])
    }

    pub fn remove(&mut self, id: &BlurbId) -> Result<Blurb, BoardError> {
        let index = self.index_of(id)?;
        if self.blurbs.len() <= self.config.min_blurbs {
            return Err(BoardError::BelowMinimum {
                min: self.config.min_blurbs,
            });
        }
        let blurb = self.blurbs.remove(index);
        tracing::debug!(id = %blurb.id, "removed blurb");
        Ok(blurb)
    }

    /// Move a blurb to display position `rank`. Only the moved blurb's
    /// weight changes. Returns false if it was already there.
    pub fn move_to(&mut self, id: &BlurbId, rank: usize) -> Result<bool, BoardError> {
        let index = self.index_of(id)?;
        if self.rank_of(id) == Some(rank) {
            return Ok(false);
        }
        let weight = self.place(Some(index), rank)?;
        // A renumbering pass inside `place` keeps indices stable.
        self.blurbs[index].sort_weight = weight;
        tracing::debug!(id = %id, rank, weight, "moved blurb");
        Ok(true)
    }

    /// [`Board::move_to`], refused if the board changed since `expected` was read.
    pub fn move_to_at(&mut self, expected: &Revision, id: &BlurbId, rank: usize) -> Result<bool, BoardError> {
        if self.revision() != *expected {
            return Err(BoardError::StaleSnapshot);
        }
        self.move_to(id, rank)
    }

    pub fn move_up(&mut self, id: &BlurbId) -> Result<bool, BoardError> {
        let rank = self.rank_of(id).ok_or_else(|| BoardError::UnknownBlurb { id: id.clone() })?;
        if rank == 0 {
            return Ok(false);
        }
        self.move_to(id, rank - 1)
    }

    pub fn move_down(&mut self, id: &BlurbId) -> Result<bool, BoardError> {
        let rank = self.rank_of(id).ok_or_else(|| BoardError::UnknownBlurb { id: id.clone() })?;
        if rank + 1 == self.blurbs.len() {
            return Ok(false);
        }
        self.move_to(id, rank + 1)
    }

    /// Grow with default blurbs or shrink by dropping the last-ranked ones.
    /// Returns the dropped blurbs, first-dropped first.
    pub fn resize(&mut self, count: usize) -> Result<Vec<Blurb>, BoardError> {
        let (min, max) = (self.config.min_blurbs, self.config.max_blurbs);
        if count < min || count > max {
            return Err(BoardError::CountOutOfRange { count, min, max });
        }
        while self.blurbs.len() < count {
            self.add()?;
        }
        let mut dropped = Vec::new();
        while self.blurbs.len() > count {
            let last = self.sorted()[self.blurbs.len() - 1].id.clone();
            let index = self.index_of(&last)?;
            dropped.push(self.blurbs.remove(index));
        }
        if !dropped.is_empty() {
            tracing::debug!(count, dropped = dropped.len(), "shrank board");
        }
        Ok(dropped)
    }

    pub fn edit(&mut self, id: &BlurbId, edit: BlurbEdit) -> Result<&Blurb, BoardError> {
        let index = self.index_of(id)?;
        self.blurbs[index].apply(edit)?;
        Ok(&self.blurbs[index])
    }

    /// Rewrite all weights to evenly spaced values, keeping the order.
    pub fn renumber(&mut self) {
        renumber(&mut self.blurbs, self.weights.spacing);
    }

    pub fn revision(&self) -> Revision {
        let mut hasher = blake3::Hasher::new();
        let sorted = self.sorted();
        hasher.update(&(sorted.len() as u64).to_le_bytes());
        for blurb in sorted {
            let id = blurb.id.as_str().as_bytes();
            hasher.update(&(id.len() as u64).to_le_bytes());
            hasher.update(id);
            hasher.update(&blurb.sort_weight.to_bits().to_le_bytes());
        }
        Revision(*hasher.finalize().as_bytes())
    }

    /// Weight for rank `rank` among every blurb except `skip`. On a
    /// degenerate ordering the board may renumber once and retry.
    fn place(&mut self, skip: Option<usize>, rank: usize) -> Result<f64, BoardError> {
        match self.weight_among_others(skip, rank) {
            Err(WeightError::DegenerateOrdering { .. }) if self.config.auto_renumber => {
                tracing::info!(rank, "renumbering board after degenerate ordering");
                self.renumber();
                Ok(self.weight_among_others(skip, rank)?)
            }
            result => Ok(result?),
        }
    }

    fn weight_among_others(&self, skip: Option<usize>, rank: usize) -> Result<f64, WeightError> {
        let others: SmallVec<[&Blurb; INLINE_BLURBS]> = self
            .blurbs
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .map(|(_, blurb)| blurb)
            .collect();
        compute_weight_with(&others, rank, &self.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn board(count: usize) -> Board {
        let config = BoardConfig {
            default_count: count,
            ..BoardConfig::default()
        };
        Board::new(config, WeightConfig::default()).unwrap()
    }

    fn order(board: &Board) -> Vec<BlurbId> {
        board.sorted().iter().map(|blurb| blurb.id.clone()).collect()
    }

    fn weights(board: &Board) -> Vec<f64> {
        board.blurbs.iter().map(|blurb| blurb.sort_weight).collect()
    }

    #[test]
    fn seeded_defaults() {
        let board = board(3);
        assert_eq!(board.len(), 3);
        assert_eq!(weights(&board), vec![1.0, 2.0, 3.0]);
        let titles: Vec<_> = board.sorted().iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["Blurb 1", "Blurb 2", "Blurb 3"]);
    }

    #[test]
    fn move_touches_only_moved_blurb() {
        let mut board = board(4);
        let ids = order(&board);
        let before = weights(&board);

        assert!(board.move_to(&ids[3], 1).unwrap());

        let after = weights(&board);
        assert_eq!(&after[..3], &before[..3]);
        assert_eq!(after[3], 1.5);
        assert_eq!(order(&board), vec![ids[0].clone(), ids[3].clone(), ids[1].clone(), ids[2].clone()]);
    }

    #[test]
    fn move_to_current_rank_is_noop() {
        let mut board = board(3);
        let ids = order(&board);
        assert!(!board.move_to(&ids[1], 1).unwrap());
        assert_eq!(weights(&board), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn move_to_out_of_range() {
        let mut board = board(3);
        let ids = order(&board);
        let err = board.move_to(&ids[0], 3).unwrap_err();
        assert!(matches!(
            err,
            BoardError::Weight(WeightError::TargetOutOfRange { target: 3, len: 2 })
        ));
    }

    #[test]
    fn up_and_down() {
        let mut board = board(3);
        let ids = order(&board);

        assert!(!board.move_up(&ids[0]).unwrap());
        assert!(!board.move_down(&ids[2]).unwrap());

        assert!(board.move_down(&ids[0]).unwrap());
        assert_eq!(order(&board), vec![ids[1].clone(), ids[0].clone(), ids[2].clone()]);

        assert!(board.move_up(&ids[2]).unwrap());
        assert_eq!(order(&board), vec![ids[1].clone(), ids[2].clone(), ids[0].clone()]);
    }

    #[test]
    fn add_appends_after_last() {
        let mut board = board(2);
        let added = board.add().unwrap().clone();
        assert_eq!(added.sort_weight, 3.0);
        assert_eq!(added.title, "Blurb 3");
        assert_eq!(board.rank_of(&added.id), Some(2));
    }

    #[test]
    fn add_respects_capacity() {
        let mut board = board(4);
        assert!(matches!(board.add(), Err(BoardError::CapacityExceeded { max: 4 })));
    }

    #[test]
    fn remove_respects_minimum() {
        let mut board = board(2);
        let ids = order(&board);
        let removed = board.remove(&ids[0]).unwrap();
        assert_eq!(removed.id, ids[0]);
        assert!(matches!(board.remove(&ids[1]), Err(BoardError::BelowMinimum { min: 1 })));
    }

    #[test]
    fn unknown_id() {
        let mut board = board(2);
        let missing = BlurbId::from("id-missing");
        assert!(matches!(board.remove(&missing), Err(BoardError::UnknownBlurb { .. })));
        assert!(matches!(board.move_up(&missing), Err(BoardError::UnknownBlurb { .. })));
        assert!(board.get(&missing).is_none());
    }

    #[test]
    fn resize_keeps_content() {
        let mut board = board(2);
        let ids = order(&board);
        board
            .edit(&ids[0], BlurbEdit {
                title: Some("Kept".to_string()),
                ..BlurbEdit::default()
            })
            .unwrap();

        assert!(board.resize(4).unwrap().is_empty());
        assert_eq!(board.len(), 4);
        assert_eq!(board.get(&ids[0]).unwrap().title, "Kept");

        let dropped = board.resize(1).unwrap();
        assert_eq!(dropped.len(), 3);
        assert_eq!(order(&board), vec![ids[0].clone()]);

        assert!(matches!(board.resize(5), Err(BoardError::CountOutOfRange { count: 5, .. })));
        assert!(matches!(board.resize(0), Err(BoardError::CountOutOfRange { count: 0, .. })));
    }

    #[test]
    fn degenerate_move_renumbers() {
        let mut board = board(3);
        let ids = order(&board);
        board.blurbs[1].sort_weight = 1.0 + f64::EPSILON;

        // Rank 1 among [1.0, 1.0 + eps] has no room left.
        assert!(board.move_to(&ids[2], 1).unwrap());
        assert_eq!(order(&board), vec![ids[0].clone(), ids[2].clone(), ids[1].clone()]);
        assert_eq!(weights(&board), vec![1.0, 2.0, 1.5]);
    }

    #[test]
    fn degenerate_move_without_auto_renumber() {
        let config = BoardConfig {
            default_count: 3,
            auto_renumber: false,
            ..BoardConfig::default()
        };
        let mut board = Board::new(config, WeightConfig::default()).unwrap();
        let ids = order(&board);
        board.blurbs[1].sort_weight = 1.0 + f64::EPSILON;

        let err = board.move_to(&ids[2], 1).unwrap_err();
        assert!(matches!(err, BoardError::Weight(WeightError::DegenerateOrdering { .. })));
        assert_eq!(board.blurbs[2].sort_weight, 3.0);
    }

    #[test]
    fn revision_tracks_ordering() {
        let mut board = board(3);
        let ids = order(&board);
        let first = board.revision();
        assert_eq!(first, board.revision());

        board
            .edit(&ids[0], BlurbEdit {
                text: Some("content only".to_string()),
                ..BlurbEdit::default()
            })
            .unwrap();
        assert_eq!(first, board.revision());

        assert!(board.move_to_at(&first, &ids[2], 0).unwrap());
        assert_ne!(first, board.revision());
        assert!(matches!(
            board.move_to_at(&first, &ids[1], 0),
            Err(BoardError::StaleSnapshot)
        ));
    }

    #[test]
    fn repairs_broken_weights_on_load() {
        let mut a = Blurb::new(1, 5.0);
        a.id = BlurbId::from("id-a");
        let mut b = Blurb::new(2, 5.0);
        b.id = BlurbId::from("id-b");
        let mut c = Blurb::new(3, f64::NAN);
        c.id = BlurbId::from("id-c");
        let props = BoardProperties {
            blurbs: vec![a, b, c],
            ..BoardProperties::default()
        };

        let board = Board::from_properties(props, BoardConfig::default(), WeightConfig::default()).unwrap();
        assert_eq!(weights(&board), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn regenerates_duplicate_ids_on_load() {
        let mut a = Blurb::new(1, 1.0);
        a.id = BlurbId::from("id-same");
        let mut b = Blurb::new(2, 2.0);
        b.id = BlurbId::from("id-same");
        let props = BoardProperties {
            blurbs: vec![a, b],
            ..BoardProperties::default()
        };

        let board = Board::from_properties(props, BoardConfig::default(), WeightConfig::default()).unwrap();
        let ids = order(&board);
        assert_eq!(ids[0], BlurbId::from("id-same"));
        assert_ne!(ids[1], ids[0]);
        assert_eq!(board.get(&ids[1]).unwrap().title, "Blurb 2");
        assert_eq!(board.rank_of(&ids[1]), Some(1));
        assert_eq!(weights(&board), vec![1.0, 2.0]);
    }

    #[test]
    fn pads_to_container_count_on_load() {
        let props = BoardProperties {
            container_count: Some(3),
            blurbs: vec![Blurb::new(1, 1.0)],
            ..BoardProperties::default()
        };
        let board = Board::from_properties(props, BoardConfig::default(), WeightConfig::default()).unwrap();
        assert_eq!(weights(&board), vec![1.0, 2.0, 3.0]);

        let board = Board::from_properties(
            BoardProperties::default(),
            BoardConfig::default(),
            WeightConfig::default(),
        )
        .unwrap();
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn rejects_count_above_limit() {
        let config = BoardConfig {
            default_count: 9,
            max_blurbs: 4,
            ..BoardConfig::default()
        };
        let err = Board::new(config, WeightConfig::default()).unwrap_err();
        assert!(matches!(err, BoardError::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_negative_step() {
        let weights = WeightConfig {
            step: -1.0,
            ..WeightConfig::default()
        };
        let err = Board::new(BoardConfig::default(), weights.clone()).unwrap_err();
        assert!(matches!(err, BoardError::Config(ConfigError::Invalid { .. })));

        let err = Board::from_properties(BoardProperties::default(), BoardConfig::default(), weights).unwrap_err();
        assert!(matches!(err, BoardError::Config(ConfigError::Invalid { .. })));
    }
}
