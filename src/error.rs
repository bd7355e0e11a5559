//! Error types for the decision engine.
//!
//! Every input-validation failure names the offending field so the caller can
//! surface it directly. `FactorRange` and `IncompleteFactorSet` indicate
//! internal defects: they fail the single request but never panic.

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::factors::FactorName;

/// Errors produced by the engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Malformed, duplicated or wrongly counted cards.
    #[error("Invalid hand ({field}): {reason}")]
    InvalidHand {
        /// Input field holding the bad cards.
        field: &'static str,
        /// What was wrong with them.
        reason: String,
    },

    /// Board length inconsistent with the street, or more than 5 cards.
    #[error("Invalid board ({field}): {reason}")]
    InvalidBoard {
        /// Input field at fault: the board itself or the declared street.
        field: &'static str,
        /// What was wrong with the board.
        reason: String,
    },

    /// Unparseable range, or no legal combination left after dead cards.
    #[error("Invalid range ({field}): {reason}")]
    InvalidRange {
        /// Input field holding the range.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Risk preference outside `[0, max]`.
    #[error("Risk preference {value} is out of range [0, {max}]")]
    InvalidRiskPreference {
        /// Supplied value.
        value: f64,
        /// Configured maximum.
        max: f64,
    },

    /// Pot, stack or opponent-profile value that cannot describe a real hand.
    #[error("Invalid game state ({field}): {reason}")]
    InvalidState {
        /// Offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A computed factor fell outside its declared range.
    #[error("Factor {factor} = {value} is outside [{min}, {max}]")]
    FactorRange {
        /// Factor that failed the check.
        factor: FactorName,
        /// Computed value.
        value: f64,
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },

    /// A factor required by the decision policy is missing.
    #[error("Factor set is missing required factor {factor}")]
    IncompleteFactorSet {
        /// Missing factor.
        factor: FactorName,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// True for internal defects, as opposed to caller input errors.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EngineError::FactorRange { .. } | EngineError::IncompleteFactorSet { .. }
        )
    }

    pub(crate) fn hand(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidHand {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn board(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidBoard {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidRange {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn state(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidState {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
