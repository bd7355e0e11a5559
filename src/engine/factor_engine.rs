//! Factor engine.
//!
//! Static factors come from the game state alone. The equity source is then
//! queried exactly once, and the dynamic factors are derived from that
//! result. Every value is range-checked as it enters the [`FactorSet`].

use crate::cards::{Card, HandEvaluator, HoleCards, Street};
use crate::config::FactorConfig;
use crate::engine::factors::{BettingContext, FactorName, FactorSet};
use crate::engine::state::{GameState, OpponentProfile, Position};
use crate::engine::texture::{draw_probability, BoardTexture, Draws};
use crate::equity::{implied_pot_odds, pot_odds, EquityResult, EquitySource};
use crate::error::Result;

/// Factors computed without simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticFactors {
    pub hand_strength: f64,
    pub position_factor: f64,
    pub texture: BoardTexture,
    pub draws: Draws,
    pub draw_probability: f64,
    pub profile: OpponentProfile,
    pub betting_pressure: f64,
}

/// Factors derived from the computed equity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicFactors {
    pub equity: f64,
    pub pot_odds: f64,
    pub stack_to_pot_ratio: f64,
    pub implied_odds: f64,
    pub fold_equity: f64,
    pub pot_commitment: f64,
}

/// Builds a [`FactorSet`] from a [`GameState`].
#[derive(Debug, Clone, Default)]
pub struct FactorEngine {
    config: FactorConfig,
    evaluator: HandEvaluator,
}

impl FactorEngine {
    /// Create an engine with the given coefficients.
    pub fn new(config: FactorConfig) -> Self {
        Self {
            config,
            evaluator: HandEvaluator::new(),
        }
    }

    pub fn config(&self) -> &FactorConfig {
        &self.config
    }

    /// Compute every factor for `state`, querying `source` once for equity.
    pub fn compute<S>(&self, state: &GameState, source: &mut S, iterations: usize) -> Result<FactorSet>
    where
        S: EquitySource + ?Sized,
    {
        state.validate()?;

        let statics = self.static_factors(state)?;
        let equity = source.estimate(&state.equity_query(iterations))?;
        let dynamics = self.dynamic_factors(state, &statics, &equity);

        log::debug!(
            "Factors for {} on {:?}: strength {:.3}, equity {:.3} ({}), fold equity {:.3}",
            state.hero,
            state.board,
            statics.hand_strength,
            dynamics.equity,
            equity.method,
            dynamics.fold_equity
        );

        let context = BettingContext {
            pot: state.pot,
            to_call: state.to_call,
            hero_stack: state.hero_stack,
            villain_stack: state.villain_stack,
            invested: state.invested,
            street: state.street,
            position: state.position,
        };

        let mut builder = FactorSet::builder(context, equity);
        builder
            .insert(FactorName::HandStrength, statics.hand_strength)?
            .insert(FactorName::PositionFactor, statics.position_factor)?
            .insert(FactorName::BoardWetness, statics.texture.wetness)?
            .insert(FactorName::Outs, statics.draws.outs as f64)?
            .insert(FactorName::DrawProbability, statics.draw_probability)?
            .insert(FactorName::OpponentAggression, statics.profile.aggression)?
            .insert(FactorName::OpponentTightness, statics.profile.tightness)?
            .insert(FactorName::BettingPressure, statics.betting_pressure)?
            .insert(FactorName::Equity, dynamics.equity)?
            .insert(FactorName::PotOdds, dynamics.pot_odds)?
            .insert(FactorName::StackToPotRatio, dynamics.stack_to_pot_ratio)?
            .insert(FactorName::ImpliedOdds, dynamics.implied_odds)?
            .insert(FactorName::FoldEquity, dynamics.fold_equity)?
            .insert(FactorName::PotCommitment, dynamics.pot_commitment)?;
        Ok(builder.build())
    }

    /// Factors that need no simulation.
    pub fn static_factors(&self, state: &GameState) -> Result<StaticFactors> {
        let hand_strength = if state.board.len() >= 3 {
            let mut cards: Vec<Card> = state.hero.cards().to_vec();
            cards.extend_from_slice(state.board.cards());
            self.evaluator.evaluate(&cards)?.percentile
        } else {
            preflop_strength(&state.hero)
        };

        let texture = BoardTexture::analyze(&state.board);
        let draws = Draws::count(&state.hero, &state.board);
        let profile = state.profile(&self.config);
        let betting_pressure = (profile.recent_bet_pct / 100.0 / self.config.pressure_scale).min(1.0);

        Ok(StaticFactors {
            hand_strength,
            position_factor: position_factor(state.position, state.street),
            texture,
            draws,
            draw_probability: draw_probability(draws.outs, state.street),
            profile,
            betting_pressure,
        })
    }

    /// Factors that depend on the computed equity.
    pub fn dynamic_factors(&self, state: &GameState, statics: &StaticFactors, equity: &EquityResult) -> DynamicFactors {
        let effective = state.effective_stack();
        let pot_odds = pot_odds(state.pot, state.to_call);

        DynamicFactors {
            equity: equity.equity,
            pot_odds,
            stack_to_pot_ratio: effective / state.pot,
            implied_odds: self.implied_odds(state, statics, pot_odds),
            fold_equity: self.fold_equity(state, statics),
            pot_commitment: pot_commitment(state.invested, state.hero_stack),
        }
    }

    /// Pot odds discounted by the chips won when the draw arrives.
    fn implied_odds(&self, state: &GameState, statics: &StaticFactors, pot_odds: f64) -> f64 {
        if statics.draw_probability <= 0.0 {
            return pot_odds;
        }

        let coeffs = &self.config.implied;
        let multiplier = (coeffs.base
            + statics.profile.aggression * coeffs.aggression_weight
            + statics.betting_pressure * coeffs.pressure_weight)
            .clamp(coeffs.min_multiplier, coeffs.max_multiplier);

        let street_factor = match state.street {
            Street::Flop => 1.0,
            Street::Turn => coeffs.turn_factor,
            Street::Preflop | Street::River => 0.0,
        };

        let future_bets = (state.pot * multiplier).min(state.effective_stack()) * street_factor;
        implied_pot_odds(state.pot, state.to_call, future_bets, statics.draw_probability)
    }

    /// Likelihood that a bet takes the pot down immediately.
    fn fold_equity(&self, state: &GameState, statics: &StaticFactors) -> f64 {
        let coeffs = &self.config.fold_equity;
        let profile = &statics.profile;

        let mut fe = (1.0 - profile.aggression) * coeffs.passivity_weight
            + profile.tightness * coeffs.tightness_weight
            + (1.0 - statics.betting_pressure) * coeffs.calm_weight;

        if state.position.is_late() {
            fe *= coeffs.late_position;
        } else if state.position.is_early() {
            fe *= coeffs.early_position;
        }

        fe *= (1.0 - statics.texture.wetness * coeffs.wetness_penalty).max(coeffs.min_wetness_multiplier);

        match state.street {
            Street::Turn => fe *= coeffs.turn_multiplier,
            Street::River => fe *= coeffs.river_multiplier,
            Street::Preflop | Street::Flop => {}
        }

        fe.clamp(0.0, 1.0)
    }
}

/// Position advantage: blinds are weak postflop, the button is best.
pub fn position_factor(position: Position, street: Street) -> f64 {
    if position.is_blind() {
        return if street == Street::Preflop { 0.5 } else { 0.1 };
    }
    (position.index() as f64 + 2.0) / 11.0
}

/// Share of hero's chips already committed to the pot.
pub fn pot_commitment(invested: f64, hero_stack: f64) -> f64 {
    let total = invested + hero_stack;
    if total <= 0.0 {
        return 0.0;
    }
    invested / total
}

/// Heuristic strength of two hole cards before the flop, in [0.05, 0.98].
pub fn preflop_strength(hero: &HoleCards) -> f64 {
    // 2..=14 scale
    let high = hero.card1.rank().max(hero.card2.rank()) as f64 + 2.0;
    let low = hero.card1.rank().min(hero.card2.rank()) as f64 + 2.0;

    if hero.is_pair() {
        let strength = 0.5 + (high - 2.0) / 12.0 * 0.45;
        return strength.clamp(0.45, 0.98);
    }

    let mut strength = 0.18 + high / 14.0 * 0.45 + low / 14.0 * 0.22;
    if hero.is_suited() {
        strength += 0.07;
    }

    let gap = high - low;
    strength += match gap as u8 {
        1 => 0.08,
        2 => 0.05,
        3 => 0.03,
        _ => -(0.02 * (gap - 3.0)).min(0.12),
    };

    if high == 14.0 {
        strength += 0.05;
    }
    if high >= 13.0 && low >= 10.0 {
        strength += 0.03;
    }

    strength.clamp(0.05, 0.9)
}
