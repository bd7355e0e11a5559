//! Decision factors.
//!
//! A [`FactorSet`] is assembled once per decision through a
//! [`FactorSetBuilder`], which range-checks every value on insertion.
//! Once built it is read-only.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::Street;
use crate::engine::state::Position;
use crate::equity::EquityResult;
use crate::error::{EngineError, Result};

/// Whether a factor depends on the computed equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Derived from the game state alone.
    Static,
    /// Derived with the computed equity.
    Dynamic,
}

/// Names of all decision factors, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorName {
    HandStrength,
    PositionFactor,
    BoardWetness,
    Outs,
    DrawProbability,
    OpponentAggression,
    OpponentTightness,
    BettingPressure,
    Equity,
    PotOdds,
    StackToPotRatio,
    ImpliedOdds,
    FoldEquity,
    PotCommitment,
}

impl FactorName {
    /// All factors in reporting order.
    pub const ALL: [FactorName; 14] = [
        FactorName::HandStrength,
        FactorName::PositionFactor,
        FactorName::BoardWetness,
        FactorName::Outs,
        FactorName::DrawProbability,
        FactorName::OpponentAggression,
        FactorName::OpponentTightness,
        FactorName::BettingPressure,
        FactorName::Equity,
        FactorName::PotOdds,
        FactorName::StackToPotRatio,
        FactorName::ImpliedOdds,
        FactorName::FoldEquity,
        FactorName::PotCommitment,
    ];

    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorName::HandStrength => "hand_strength",
            FactorName::PositionFactor => "position_factor",
            FactorName::BoardWetness => "board_wetness",
            FactorName::Outs => "outs",
            FactorName::DrawProbability => "draw_probability",
            FactorName::OpponentAggression => "opponent_aggression",
            FactorName::OpponentTightness => "opponent_tightness",
            FactorName::BettingPressure => "betting_pressure",
            FactorName::Equity => "equity",
            FactorName::PotOdds => "pot_odds",
            FactorName::StackToPotRatio => "stack_to_pot_ratio",
            FactorName::ImpliedOdds => "implied_odds",
            FactorName::FoldEquity => "fold_equity",
            FactorName::PotCommitment => "pot_commitment",
        }
    }

    /// Static or dynamic.
    pub fn kind(&self) -> FactorKind {
        match self {
            FactorName::Equity
            | FactorName::PotOdds
            | FactorName::StackToPotRatio
            | FactorName::ImpliedOdds
            | FactorName::FoldEquity
            | FactorName::PotCommitment => FactorKind::Dynamic,
            _ => FactorKind::Static,
        }
    }

    /// Declared `(min, max)` of the factor.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            FactorName::Outs => (0.0, 47.0),
            FactorName::StackToPotRatio => (0.0, f64::INFINITY),
            _ => (0.0, 1.0),
        }
    }
}

impl fmt::Display for FactorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single range-checked factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorValue {
    pub name: FactorName,
    pub value: f64,
    pub min: f64,
    /// Serialized as `null` when unbounded.
    #[serde(deserialize_with = "upper_bound")]
    pub max: f64,
    pub kind: FactorKind,
}

fn upper_bound<'de, D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

impl FactorValue {
    /// Check `value` against the factor's declared bounds.
    pub fn new(name: FactorName, value: f64) -> Result<Self> {
        let (min, max) = name.bounds();
        // NaN fails both comparisons
        if !(value >= min && value <= max) {
            return Err(EngineError::FactorRange {
                factor: name,
                value,
                min,
                max,
            });
        }
        Ok(Self {
            name,
            value,
            min,
            max,
            kind: name.kind(),
        })
    }
}

/// Betting amounts the factors were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BettingContext {
    pub pot: f64,
    pub to_call: f64,
    pub hero_stack: f64,
    pub villain_stack: f64,
    pub invested: f64,
    pub street: Street,
    pub position: Position,
}

impl BettingContext {
    /// The smaller of the two stacks.
    pub fn effective_stack(&self) -> f64 {
        self.hero_stack.min(self.villain_stack)
    }
}

/// Complete, immutable set of factors for one decision.
#[derive(Debug, Clone)]
pub struct FactorSet {
    values: FxHashMap<FactorName, FactorValue>,
    context: BettingContext,
    equity: EquityResult,
}

impl FactorSet {
    /// Start a set for the given context and equity.
    pub fn builder(context: BettingContext, equity: EquityResult) -> FactorSetBuilder {
        FactorSetBuilder {
            values: FxHashMap::default(),
            context,
            equity,
        }
    }

    /// Look up a factor.
    pub fn get(&self, name: FactorName) -> Option<&FactorValue> {
        self.values.get(&name)
    }

    /// Value of a factor the caller requires.
    pub fn value(&self, name: FactorName) -> Result<f64> {
        self.values
            .get(&name)
            .map(|f| f.value)
            .ok_or(EngineError::IncompleteFactorSet { factor: name })
    }

    /// All factors in reporting order.
    pub fn ordered(&self) -> Vec<FactorValue> {
        FactorName::ALL
            .iter()
            .filter_map(|name| self.values.get(name).copied())
            .collect()
    }

    pub fn context(&self) -> &BettingContext {
        &self.context
    }

    pub fn equity(&self) -> &EquityResult {
        &self.equity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Collects range-checked factors into a [`FactorSet`].
#[derive(Debug)]
pub struct FactorSetBuilder {
    values: FxHashMap<FactorName, FactorValue>,
    context: BettingContext,
    equity: EquityResult,
}

impl FactorSetBuilder {
    /// Insert a factor, failing if it is outside its declared range.
    pub fn insert(&mut self, name: FactorName, value: f64) -> Result<&mut Self> {
        self.values.insert(name, FactorValue::new(name, value)?);
        Ok(self)
    }

    /// Finish the set.
    pub fn build(self) -> FactorSet {
        FactorSet {
            values: self.values,
            context: self.context,
            equity: self.equity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equity::EquityMethod;

    fn context() -> BettingContext {
        BettingContext {
            pot: 100.0,
            to_call: 20.0,
            hero_stack: 500.0,
            villain_stack: 400.0,
            invested: 0.0,
            street: Street::Flop,
            position: Position::BTN,
        }
    }

    fn equity() -> EquityResult {
        EquityResult {
            equity: 0.6,
            win: 0.6,
            tie: 0.0,
            loss: 0.4,
            iterations: 1000,
            method: EquityMethod::MonteCarlo,
            std_error: 0.01,
            converged: false,
            timed_out: false,
            elapsed_ms: 1,
        }
    }

    #[test]
    fn test_range_check() {
        assert!(FactorValue::new(FactorName::Equity, 0.5).is_ok());
        assert!(FactorValue::new(FactorName::Outs, 12.0).is_ok());
        assert!(FactorValue::new(FactorName::StackToPotRatio, 250.0).is_ok());

        let err = FactorValue::new(FactorName::Equity, 1.01).unwrap_err();
        assert!(matches!(err, EngineError::FactorRange { factor: FactorName::Equity, .. }));
        assert!(FactorValue::new(FactorName::PotOdds, f64::NAN).is_err());
        assert!(FactorValue::new(FactorName::Outs, 48.0).is_err());
        assert!(FactorValue::new(FactorName::StackToPotRatio, -0.1).is_err());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(FactorName::Equity.kind(), FactorKind::Dynamic);
        assert_eq!(FactorName::BoardWetness.kind(), FactorKind::Static);
        let dynamic = FactorName::ALL.iter().filter(|n| n.kind() == FactorKind::Dynamic).count();
        assert_eq!(dynamic, 6);
    }

    #[test]
    fn test_builder_and_lookup() {
        let mut builder = FactorSet::builder(context(), equity());
        builder
            .insert(FactorName::PotOdds, 20.0 / 120.0)
            .unwrap()
            .insert(FactorName::Equity, 0.6)
            .unwrap();
        let set = builder.build();

        assert_eq!(set.len(), 2);
        assert_eq!(set.value(FactorName::Equity).unwrap(), 0.6);
        assert!(matches!(
            set.value(FactorName::FoldEquity),
            Err(EngineError::IncompleteFactorSet { factor: FactorName::FoldEquity })
        ));

        // Reporting order follows FactorName, not insertion
        let names: Vec<_> = set.ordered().iter().map(|f| f.name).collect();
        assert_eq!(names, vec![FactorName::Equity, FactorName::PotOdds]);
        assert_eq!(set.context().effective_stack(), 400.0);
    }

    #[test]
    fn test_factor_serde() {
        let value = FactorValue::new(FactorName::StackToPotRatio, 4.0).unwrap();
        let json = serde_json::to_value(value).unwrap();
        assert_eq!(json["name"], "stack_to_pot_ratio");
        assert_eq!(json["kind"], "dynamic");
        assert_eq!(FactorName::BettingPressure.to_string(), "betting_pressure");
    }
}
