//! Engine configuration.
//!
//! Three sections, one per stage of the pipeline:
//! - [`EquityConfig`]: sampling budgets, convergence and parallelism
//! - [`FactorConfig`]: opponent defaults and the implied-odds / fold-equity coefficients
//! - [`DecisionConfig`]: risk margin, sizing and confidence parameters
//!
//! Every section has a `Default`, builder `with_*` methods and `validate()`.
//! Missing JSON fields fall back to their defaults.
//!
//! # Example
//! ```
//! use qpds_engine::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "equity": { "iterations": 20000 } }"#).unwrap();
//! assert_eq!(config.equity.iterations, 20000);
//! assert_eq!(config.decision.alpha, 0.05);
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Equity estimation.
    pub equity: EquityConfig,
    /// Factor computation.
    pub factors: FactorConfig,
    /// Decision policy.
    pub decision: DecisionConfig,
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method: replace the equity section.
    pub fn with_equity(mut self, equity: EquityConfig) -> Self {
        self.equity = equity;
        self
    }

    /// Builder method: replace the factor section.
    pub fn with_factors(mut self, factors: FactorConfig) -> Self {
        self.factors = factors;
        self
    }

    /// Builder method: replace the decision section.
    pub fn with_decision(mut self, decision: DecisionConfig) -> Self {
        self.decision = decision;
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.equity.validate()?;
        self.factors.validate()?;
        self.decision.validate()
    }
}

/// Configuration for the equity calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquityConfig {
    /// Monte Carlo trial budget.
    pub iterations: usize,

    /// Trials to run before the convergence check may stop sampling.
    pub min_iterations: usize,

    /// Trials per batch. Each batch gets its own RNG seeded from the master RNG.
    pub batch_size: usize,

    /// Stop once the standard error of the running equity falls below this.
    ///
    /// Set to `None` to always run the full budget.
    pub convergence_threshold: Option<f64>,

    /// Wall-clock budget in milliseconds. The estimate so far is returned,
    /// flagged as timed out. `None` disables the limit.
    pub max_time_ms: Option<u64>,

    /// Largest evaluation count for which exact enumeration is used.
    pub max_exact_evaluations: u64,

    /// Number of worker threads.
    ///
    /// `None` uses the global rayon pool; `Some(1)` runs sequentially.
    pub num_threads: Option<usize>,

    /// Random seed for reproducibility. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            min_iterations: 1_000,
            batch_size: 2_000,
            convergence_threshold: Some(0.002),
            max_time_ms: Some(10_000),
            max_exact_evaluations: 500_000,
            num_threads: None,
            seed: None,
        }
    }
}

impl EquityConfig {
    /// Create a new EquityConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the trial budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder method: set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builder method: set or disable the convergence threshold.
    pub fn with_convergence(mut self, threshold: Option<f64>) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Builder method: set or disable the time budget.
    pub fn with_max_time_ms(mut self, max_time_ms: Option<u64>) -> Self {
        self.max_time_ms = max_time_ms;
        self
    }

    /// Builder method: set the exact enumeration bound.
    pub fn with_max_exact(mut self, evaluations: u64) -> Self {
        self.max_exact_evaluations = evaluations;
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::invalid("equity.iterations", "must be positive"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("equity.batch_size", "must be positive"));
        }
        if let Some(threshold) = self.convergence_threshold {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(ConfigError::invalid(
                    "equity.convergence_threshold",
                    format!("{} must be a positive number", threshold),
                ));
            }
        }
        if self.num_threads == Some(0) {
            return Err(ConfigError::invalid("equity.num_threads", "must be at least 1"));
        }
        Ok(())
    }
}

/// Coefficients of the implied-odds heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpliedOddsConfig {
    /// Base future-bet multiplier of the pot.
    pub base: f64,
    /// Weight of opponent aggression on the multiplier.
    pub aggression_weight: f64,
    /// Weight of betting pressure on the multiplier.
    pub pressure_weight: f64,
    /// Lower clamp of the multiplier.
    pub min_multiplier: f64,
    /// Upper clamp of the multiplier.
    pub max_multiplier: f64,
    /// Share of future bets still available from the turn.
    pub turn_factor: f64,
}

impl Default for ImpliedOddsConfig {
    fn default() -> Self {
        Self {
            base: 0.25,
            aggression_weight: 0.4,
            pressure_weight: 0.35,
            min_multiplier: 0.1,
            max_multiplier: 1.5,
            turn_factor: 0.6,
        }
    }
}

/// Coefficients of the fold-equity heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldEquityConfig {
    /// Weight of passivity (1 - aggression).
    pub passivity_weight: f64,
    /// Weight of tightness.
    pub tightness_weight: f64,
    /// Weight of low betting pressure (1 - pressure).
    pub calm_weight: f64,
    /// Multiplier in late position (CO, BTN).
    pub late_position: f64,
    /// Multiplier in early position (UTG..UTG2).
    pub early_position: f64,
    /// How strongly board wetness reduces fold equity.
    pub wetness_penalty: f64,
    /// Floor of the wetness multiplier.
    pub min_wetness_multiplier: f64,
    /// Multiplier on the turn.
    pub turn_multiplier: f64,
    /// Multiplier on the river.
    pub river_multiplier: f64,
}

impl Default for FoldEquityConfig {
    fn default() -> Self {
        Self {
            passivity_weight: 0.35,
            tightness_weight: 0.35,
            calm_weight: 0.2,
            late_position: 1.15,
            early_position: 0.9,
            wetness_penalty: 0.5,
            min_wetness_multiplier: 0.4,
            turn_multiplier: 0.9,
            river_multiplier: 0.75,
        }
    }
}

/// Configuration for the factor engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    /// Aggression assumed when no opponent profile is supplied.
    pub default_aggression: f64,
    /// Tightness assumed when no opponent profile is supplied.
    pub default_tightness: f64,
    /// Bluff frequency assumed when no opponent profile is supplied.
    pub default_bluff_frequency: f64,
    /// Typical bet size in percent of pot assumed when no profile is supplied.
    pub default_bet_pct: f64,
    /// Bet size (as a fraction of pot) at which betting pressure saturates.
    pub pressure_scale: f64,
    /// Implied-odds coefficients.
    pub implied: ImpliedOddsConfig,
    /// Fold-equity coefficients.
    pub fold_equity: FoldEquityConfig,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            default_aggression: 0.5,
            default_tightness: 0.5,
            default_bluff_frequency: 0.3,
            default_bet_pct: 65.0,
            pressure_scale: 1.5,
            implied: ImpliedOddsConfig::default(),
            fold_equity: FoldEquityConfig::default(),
        }
    }
}

impl FactorConfig {
    /// Builder method: set the default opponent tendencies.
    pub fn with_default_opponent(mut self, aggression: f64, tightness: f64) -> Self {
        self.default_aggression = aggression;
        self.default_tightness = tightness;
        self
    }

    /// Builder method: set the implied-odds coefficients.
    pub fn with_implied(mut self, implied: ImpliedOddsConfig) -> Self {
        self.implied = implied;
        self
    }

    /// Builder method: set the fold-equity coefficients.
    pub fn with_fold_equity(mut self, fold_equity: FoldEquityConfig) -> Self {
        self.fold_equity = fold_equity;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("factors.default_aggression", self.default_aggression),
            ("factors.default_tightness", self.default_tightness),
            ("factors.default_bluff_frequency", self.default_bluff_frequency),
        ] {
            check_unit(field, value)?;
        }
        check_non_negative("factors.default_bet_pct", self.default_bet_pct)?;
        check_positive("factors.pressure_scale", self.pressure_scale)?;

        let implied = &self.implied;
        for (field, value) in [
            ("factors.implied.base", implied.base),
            ("factors.implied.aggression_weight", implied.aggression_weight),
            ("factors.implied.pressure_weight", implied.pressure_weight),
            ("factors.implied.min_multiplier", implied.min_multiplier),
        ] {
            check_non_negative(field, value)?;
        }
        if !(implied.max_multiplier.is_finite() && implied.max_multiplier >= implied.min_multiplier) {
            return Err(ConfigError::invalid(
                "factors.implied.max_multiplier",
                "must be finite and at least min_multiplier",
            ));
        }
        check_unit("factors.implied.turn_factor", implied.turn_factor)?;

        let fe = &self.fold_equity;
        for (field, value) in [
            ("factors.fold_equity.passivity_weight", fe.passivity_weight),
            ("factors.fold_equity.tightness_weight", fe.tightness_weight),
            ("factors.fold_equity.calm_weight", fe.calm_weight),
            ("factors.fold_equity.late_position", fe.late_position),
            ("factors.fold_equity.early_position", fe.early_position),
            ("factors.fold_equity.turn_multiplier", fe.turn_multiplier),
            ("factors.fold_equity.river_multiplier", fe.river_multiplier),
        ] {
            check_non_negative(field, value)?;
        }
        check_unit("factors.fold_equity.wetness_penalty", fe.wetness_penalty)?;
        check_unit("factors.fold_equity.min_wetness_multiplier", fe.min_wetness_multiplier)?;

        Ok(())
    }
}

/// Configuration for the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Monte Carlo budget used for a decision request.
    pub iterations: usize,

    /// Extra equity demanded at zero risk preference.
    pub alpha: f64,

    /// Largest accepted risk preference.
    pub max_risk: f64,

    /// Bet size as a fraction of the pot when checked to.
    pub bet_fraction: f64,

    /// At or below this SPR a bet becomes an all-in.
    pub shove_spr: f64,

    /// Pot commitment beyond which folding is overridden.
    pub commitment_threshold: f64,

    /// Minimum raise-to as a multiple of the amount to call.
    pub min_raise_multiple: f64,

    /// Raise increment as a fraction of the pot after calling.
    pub raise_fraction: f64,

    /// Upper bound on reported confidence.
    pub max_confidence: f64,

    /// Trial count at which Monte Carlo confidence reaches half.
    pub confidence_scale: f64,

    /// Equity margin at which confidence is mostly saturated.
    pub margin_scale: f64,

    /// Confidence multiplier for a timed-out estimate.
    pub timeout_penalty: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            iterations: 5_000,
            alpha: 0.05,
            max_risk: 10.0,
            bet_fraction: 0.66,
            shove_spr: 1.5,
            commitment_threshold: 0.5,
            min_raise_multiple: 2.5,
            raise_fraction: 0.66,
            max_confidence: 0.95,
            confidence_scale: 1_000.0,
            margin_scale: 0.1,
            timeout_penalty: 0.85,
        }
    }
}

impl DecisionConfig {
    /// Builder method: set the Monte Carlo budget for decisions.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder method: set the risk margin.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Builder method: set the largest accepted risk preference.
    pub fn with_max_risk(mut self, max_risk: f64) -> Self {
        self.max_risk = max_risk;
        self
    }

    /// Builder method: set the pot-commitment threshold.
    pub fn with_commitment_threshold(mut self, threshold: f64) -> Self {
        self.commitment_threshold = threshold;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::invalid("decision.iterations", "must be positive"));
        }
        check_unit("decision.alpha", self.alpha)?;
        check_positive("decision.max_risk", self.max_risk)?;
        check_positive("decision.bet_fraction", self.bet_fraction)?;
        check_non_negative("decision.shove_spr", self.shove_spr)?;
        check_unit("decision.commitment_threshold", self.commitment_threshold)?;
        if !(self.min_raise_multiple.is_finite() && self.min_raise_multiple > 1.0) {
            return Err(ConfigError::invalid(
                "decision.min_raise_multiple",
                format!("{} must be greater than 1", self.min_raise_multiple),
            ));
        }
        check_positive("decision.raise_fraction", self.raise_fraction)?;
        check_unit("decision.max_confidence", self.max_confidence)?;
        check_positive("decision.confidence_scale", self.confidence_scale)?;
        check_positive("decision.margin_scale", self.margin_scale)?;
        check_unit("decision.timeout_penalty", self.timeout_penalty)?;
        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(field, format!("{} is out of range [0, 1]", value)));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::invalid(field, format!("{} must be finite and non-negative", value)));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::invalid(field, format!("{} must be finite and positive", value)));
    }
    Ok(())
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
