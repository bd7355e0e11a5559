//! Weighted opponent ranges.
//!
//! ## Modules
//!
//! - `notation`: Compact range notation parser ("TT+", "AQs+", "A5s-A2s", ...)
//!
//! A [`WeightedRange`] holds each two-card combination at most once, with a
//! strictly positive weight, sorted so iteration order is deterministic.

pub mod notation;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardSet, HoleCards};
use crate::error::{EngineError, Result};

pub use notation::RangeParseError;

/// A combination and its relative likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedCombo {
    /// The two hole cards.
    pub combo: HoleCards,
    /// Non-negative weight; need not be normalized.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// A set of hole-card combinations with non-negative weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedRange {
    combos: Vec<WeightedCombo>,
}

impl WeightedRange {
    /// Build from (combo, weight) pairs.
    ///
    /// A later entry for the same combination replaces the earlier weight;
    /// zero weights are dropped. Negative or non-finite weights fail.
    pub fn from_weighted<I>(field: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (HoleCards, f64)>,
    {
        let mut weights: FxHashMap<HoleCards, f64> = FxHashMap::default();
        for (combo, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::range(
                    field,
                    format!("weight {} for {} must be finite and non-negative", weight, combo),
                ));
            }
            weights.insert(combo, weight);
        }

        let mut combos: Vec<WeightedCombo> = weights
            .into_iter()
            .filter(|&(_, weight)| weight > 0.0)
            .map(|(combo, weight)| WeightedCombo { combo, weight })
            .collect();
        combos.sort_by(|a, b| a.combo.cmp(&b.combo));

        Ok(Self { combos })
    }

    /// Parse compact notation such as `"TT+, AQs+, KQs:0.5"`.
    pub fn parse(field: &str, notation: &str) -> Result<Self> {
        let entries = notation::parse(notation)
            .map_err(|e| EngineError::range(field, e.to_string()))?;
        if entries.is_empty() {
            return Err(EngineError::range(field, "range notation is empty"));
        }
        Self::from_weighted(field, entries)
    }

    /// Every one of the 1326 combinations at weight 1.
    pub fn random() -> Self {
        let combos = notation::all_combos()
            .into_iter()
            .map(|combo| WeightedCombo { combo, weight: 1.0 })
            .collect::<Vec<_>>();
        // all_combos yields canonical HoleCards, sort for the Ord invariant
        let mut range = Self { combos };
        range.combos.sort_by(|a, b| a.combo.cmp(&b.combo));
        range
    }

    /// Number of combinations.
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    /// True when no combination carries weight.
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// Combinations in canonical order.
    pub fn combos(&self) -> &[WeightedCombo] {
        &self.combos
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.combos.iter().map(|c| c.weight).sum()
    }

    /// Weight of a combination, if present.
    pub fn weight(&self, combo: HoleCards) -> Option<f64> {
        self.combos
            .binary_search_by(|c| c.combo.cmp(&combo))
            .ok()
            .map(|i| self.combos[i].weight)
    }

    /// Remove combinations that use any dead card.
    pub fn without(&self, dead: CardSet) -> Self {
        Self {
            combos: self
                .combos
                .iter()
                .filter(|c| !c.combo.mask().intersects(dead))
                .copied()
                .collect(),
        }
    }

    /// Like [`without`](Self::without), but an empty result is an error.
    pub fn live(&self, field: &str, dead: CardSet) -> Result<Self> {
        let live = self.without(dead);
        if live.is_empty() {
            return Err(EngineError::range(
                field,
                "no legal combination remains after removing dead cards",
            ));
        }
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Board;

    #[test]
    fn test_random_range() {
        let range = WeightedRange::random();
        assert_eq!(range.len(), 1326);
        assert!((range.total_weight() - 1326.0).abs() < 1e-9);
        assert!(range.combos().windows(2).all(|w| w[0].combo < w[1].combo));
    }

    #[test]
    fn test_later_weight_replaces_earlier() {
        let range = WeightedRange::parse("villain", "AA:0.25, AsAh").unwrap();
        assert_eq!(range.len(), 6);
        assert_eq!(range.weight(HoleCards::parse("AsAh").unwrap()), Some(1.0));
        assert_eq!(range.weight(HoleCards::parse("AsAd").unwrap()), Some(0.25));
    }

    #[test]
    fn test_zero_weight_dropped() {
        let range = WeightedRange::parse("villain", "KK, AA:0").unwrap();
        assert_eq!(range.len(), 6);
        assert!(range.weight(HoleCards::parse("AsAh").unwrap()).is_none());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let aa = HoleCards::parse("AsAh").unwrap();
        let err = WeightedRange::from_weighted("villain", vec![(aa, -1.0)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { .. }));
    }

    #[test]
    fn test_dead_card_removal() {
        let range = WeightedRange::parse("villain", "AA").unwrap();
        let board = Board::parse("As Kd 2c").unwrap();
        // Three aces left: C(3,2) = 3 combos
        assert_eq!(range.without(board.mask()).len(), 3);

        let board = Board::parse("As Ah Kd").unwrap();
        let hero = HoleCards::parse("AdAc").unwrap();
        let dead = board.mask().union(hero.mask());
        let err = range.live("opponents[0]", dead).unwrap_err();
        match err {
            EngineError::InvalidRange { field, .. } => assert_eq!(field, "opponents[0]"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_names_field() {
        let err = WeightedRange::parse("opponent_range", "AX").unwrap_err();
        assert!(err.to_string().contains("opponent_range"));
        assert!(WeightedRange::parse("opponent_range", " , ").is_err());
    }
}
