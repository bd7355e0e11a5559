//! Decision policy.
//!
//! A single pass over a [`FactorSet`]:
//! 1. `EV_call = equity * (pot + to_call) - to_call`
//! 2. `required = pot_odds + alpha * (1 - risk / max_risk)`
//! 3. Checked to: bet when betting beats checking, never fold.
//!    Facing a bet with enough equity: raise when it beats calling, else call.
//!    Otherwise fold, unless already committed to the pot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::DecisionConfig;
use crate::engine::factors::{FactorName, FactorSet};
use crate::equity::EquityResult;
use crate::error::{EngineError, Result};

/// Recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Bet => write!(f, "bet"),
            Action::Raise => write!(f, "raise"),
        }
    }
}

/// One line of the explanation: a factor and why it mattered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorReason {
    pub factor: FactorName,
    pub value: f64,
    pub reason: String,
}

impl FactorReason {
    fn new(factor: FactorName, value: f64, reason: impl Into<String>) -> Self {
        Self {
            factor,
            value,
            reason: reason.into(),
        }
    }
}

/// The engine's answer for one decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    /// Bet or raise-to size, call amount, or 0 for fold and check.
    pub amount: f64,
    /// The amount is hero's whole effective stack.
    pub all_in: bool,
    pub expected_value: f64,
    /// In [0, max_confidence].
    pub confidence: f64,
    pub required_equity: f64,
    /// Folding was overridden by pot commitment.
    pub pot_committed: bool,
    /// Factors that determined the branch, most important first.
    pub explanation: Vec<FactorReason>,
}

/// Expected value of calling.
pub fn call_ev(equity: f64, pot: f64, to_call: f64) -> f64 {
    equity * (pot + to_call) - to_call
}

/// Turns factors into a recommendation.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Reject risk preferences outside `[0, max_risk]`, NaN included.
    pub fn check_risk(&self, risk: f64) -> Result<()> {
        if !(0.0..=self.config.max_risk).contains(&risk) {
            return Err(EngineError::InvalidRiskPreference {
                value: risk,
                max: self.config.max_risk,
            });
        }
        Ok(())
    }

    /// Equity needed to continue: pot odds plus a margin that shrinks with risk appetite.
    pub fn required_equity(&self, pot_odds: f64, risk: f64) -> f64 {
        pot_odds + self.config.alpha * (1.0 - risk / self.config.max_risk)
    }

    /// Recommend an action for `factors` at the given risk preference.
    pub fn decide(&self, factors: &FactorSet, risk: f64) -> Result<Recommendation> {
        self.check_risk(risk)?;

        let equity = factors.value(FactorName::Equity)?;
        let pot_odds = factors.value(FactorName::PotOdds)?;
        let fold_equity = factors.value(FactorName::FoldEquity)?;
        let spr = factors.value(FactorName::StackToPotRatio)?;
        let commitment = factors.value(FactorName::PotCommitment)?;

        let ctx = factors.context();
        let (pot, to_call) = (ctx.pot, ctx.to_call);
        let effective = ctx.effective_stack();
        let cfg = &self.config;

        let required = self.required_equity(pot_odds, risk);
        // A short stack calls all-in; the unmatched part of the bet goes back.
        let call = to_call.min(ctx.hero_stack);
        let ev_call = call_ev(equity, (pot - (to_call - call)).max(0.0), call);

        let mut explanation = Vec::new();
        let mut pot_committed = false;

        let (action, amount, all_in, expected_value) = if to_call <= 0.0 {
            let ev_check = equity * pot;

            let shove = spr <= cfg.shove_spr || commitment >= cfg.commitment_threshold;
            let bet = (if shove { effective } else { pot * cfg.bet_fraction }).min(effective);
            let ev_bet = fold_equity * pot + (1.0 - fold_equity) * (equity * (pot + 2.0 * bet) - bet);

            explanation.push(FactorReason::new(
                FactorName::Equity,
                equity,
                format!("{:.1}% equity is worth {:.2} when checking", equity * 100.0, ev_check),
            ));

            if bet > 0.0 && ev_bet > ev_check {
                explanation.push(FactorReason::new(
                    FactorName::FoldEquity,
                    fold_equity,
                    format!("betting {:.2} is worth {:.2} with {:.1}% fold equity", bet, ev_bet, fold_equity * 100.0),
                ));
                if shove {
                    explanation.push(FactorReason::new(
                        FactorName::StackToPotRatio,
                        spr,
                        format!("SPR {:.2} leaves no room for a smaller bet", spr),
                    ));
                }
                (Action::Bet, bet, bet >= effective, ev_bet)
            } else {
                explanation.push(FactorReason::new(
                    FactorName::FoldEquity,
                    fold_equity,
                    format!("betting {:.2} is worth only {:.2}", bet, ev_bet),
                ));
                (Action::Check, 0.0, false, ev_check)
            }
        } else if equity >= required {
            let raise_to = (to_call * cfg.min_raise_multiple)
                .max(to_call + (pot + to_call) * cfg.raise_fraction)
                .min(effective);
            let ev_raise = fold_equity * pot
                + (1.0 - fold_equity) * (equity * (pot + 2.0 * raise_to - to_call) - raise_to);

            explanation.push(FactorReason::new(
                FactorName::Equity,
                equity,
                format!("{:.1}% equity clears the required {:.1}%", equity * 100.0, required * 100.0),
            ));
            explanation.push(FactorReason::new(
                FactorName::PotOdds,
                pot_odds,
                format!("calling {:.2} into {:.2} needs {:.1}%", to_call, pot, pot_odds * 100.0),
            ));

            if raise_to > to_call && ev_raise > ev_call {
                explanation.push(FactorReason::new(
                    FactorName::FoldEquity,
                    fold_equity,
                    format!("raising to {:.2} is worth {:.2} against {:.2} for calling", raise_to, ev_raise, ev_call),
                ));
                (Action::Raise, raise_to, raise_to >= effective, ev_raise)
            } else {
                explanation.push(FactorReason::new(
                    FactorName::FoldEquity,
                    fold_equity,
                    format!("raising to {:.2} is worth {:.2}, calling {:.2}", raise_to, ev_raise, ev_call),
                ));
                (Action::Call, call, call >= ctx.hero_stack, ev_call)
            }
        } else if commitment > cfg.commitment_threshold {
            pot_committed = true;
            explanation.push(FactorReason::new(
                FactorName::PotCommitment,
                commitment,
                format!(
                    "{:.0}% of the stack is already in the pot, above the {:.0}% threshold",
                    commitment * 100.0,
                    cfg.commitment_threshold * 100.0
                ),
            ));
            explanation.push(FactorReason::new(
                FactorName::Equity,
                equity,
                format!("{:.1}% equity is below the required {:.1}%", equity * 100.0, required * 100.0),
            ));
            (Action::Call, call, call >= ctx.hero_stack, ev_call)
        } else {
            explanation.push(FactorReason::new(
                FactorName::Equity,
                equity,
                format!("{:.1}% equity is below the required {:.1}%", equity * 100.0, required * 100.0),
            ));
            explanation.push(FactorReason::new(
                FactorName::PotOdds,
                pot_odds,
                format!("calling {:.2} into {:.2} needs {:.1}%", to_call, pot, pot_odds * 100.0),
            ));
            if let Some(outs) = factors.get(FactorName::Outs).filter(|f| f.value > 0.0) {
                let implied = factors.value(FactorName::ImpliedOdds)?;
                explanation.push(FactorReason::new(
                    FactorName::ImpliedOdds,
                    implied,
                    format!("{} outs improve the price only to {:.1}%", outs.value, implied * 100.0),
                ));
            }
            (Action::Fold, 0.0, false, 0.0)
        };

        let confidence = self.confidence(factors.equity(), equity - required);

        log::debug!(
            "Decision: {} {:.2} (EV {:.2}, equity {:.3}, required {:.3}, confidence {:.2})",
            action,
            amount,
            expected_value,
            equity,
            required,
            confidence
        );

        Ok(Recommendation {
            action,
            amount,
            all_in,
            expected_value,
            confidence,
            required_equity: required,
            pot_committed,
            explanation,
        })
    }

    /// Confidence from sampling quality and the distance to the threshold.
    pub fn confidence(&self, equity: &EquityResult, margin: f64) -> f64 {
        let cfg = &self.config;
        let mut sampling = if equity.is_exact() {
            1.0
        } else {
            let n = equity.iterations as f64;
            n / (n + cfg.confidence_scale)
        };
        if equity.timed_out {
            sampling *= cfg.timeout_penalty;
        }
        let margin_factor = 0.5 + 0.5 * (margin.abs() / cfg.margin_scale).tanh();
        (cfg.max_confidence * sampling * margin_factor).clamp(0.0, cfg.max_confidence)
    }
}
