//! Decision-point game state.
//!
//! A [`GameState`] is the single-decision snapshot the factor engine works
//! from: hero's cards, the board, the betting amounts, hero's seat and what
//! is known about the opponents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cards::{Board, HoleCards, Street};
use crate::config::FactorConfig;
use crate::equity::{EquityQuery, MethodPreference};
use crate::error::{EngineError, Result};
use crate::range::WeightedRange;

/// Most opponents that can be dealt in alongside hero and a full board.
pub const MAX_OPPONENTS: usize = (52 - 2 - 5) / 2;

/// Seat at a full-ring table, in preflop action order.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Position {
    UTG = 0,
    UTG1 = 1,
    UTG2 = 2,
    MP1 = 3,
    MP2 = 4,
    MP3 = 5,
    LJ = 6,
    HJ = 7,
    CO = 8,
    BTN = 9,
    SB = 10,
    BB = 11,
}

impl Position {
    /// All positions in preflop action order.
    pub const ALL: [Position; 12] = [
        Position::UTG,
        Position::UTG1,
        Position::UTG2,
        Position::MP1,
        Position::MP2,
        Position::MP3,
        Position::LJ,
        Position::HJ,
        Position::CO,
        Position::BTN,
        Position::SB,
        Position::BB,
    ];

    /// Get position index.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get position name.
    pub fn name(&self) -> &'static str {
        match self {
            Position::UTG => "UTG",
            Position::UTG1 => "UTG1",
            Position::UTG2 => "UTG2",
            Position::MP1 => "MP1",
            Position::MP2 => "MP2",
            Position::MP3 => "MP3",
            Position::LJ => "LJ",
            Position::HJ => "HJ",
            Position::CO => "CO",
            Position::BTN => "BTN",
            Position::SB => "SB",
            Position::BB => "BB",
        }
    }

    /// Small or big blind.
    pub fn is_blind(&self) -> bool {
        matches!(self, Position::SB | Position::BB)
    }

    /// Cutoff or button.
    pub fn is_late(&self) -> bool {
        matches!(self, Position::CO | Position::BTN)
    }

    /// The three under-the-gun seats.
    pub fn is_early(&self) -> bool {
        matches!(self, Position::UTG | Position::UTG1 | Position::UTG2)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase().replace(['+', '-', '_'], "");
        let alias = match upper.as_str() {
            "BU" | "BUTTON" => "BTN",
            "CUTOFF" => "CO",
            "HIJACK" => "HJ",
            "LOJACK" => "LJ",
            "EP" => "UTG",
            "MP" => "MP1",
            other => other,
        };
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.name() == alias)
            .ok_or_else(|| EngineError::state("position", format!("unknown position '{}'", s)))
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Observed tendencies of the opponents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentProfile {
    /// How often they bet and raise, in [0, 1].
    pub aggression: f64,
    /// How selective their starting hands are, in [0, 1].
    pub tightness: f64,
    /// Share of their bets that are bluffs, in [0, 1].
    pub bluff_frequency: f64,
    /// Typical bet size, percent of pot.
    pub recent_bet_pct: f64,
}

impl Default for OpponentProfile {
    fn default() -> Self {
        Self::from_config(&FactorConfig::default())
    }
}

impl OpponentProfile {
    /// The configured defaults, used when nothing is known.
    pub fn from_config(config: &FactorConfig) -> Self {
        Self {
            aggression: config.default_aggression,
            tightness: config.default_tightness,
            bluff_frequency: config.default_bluff_frequency,
            recent_bet_pct: config.default_bet_pct,
        }
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("opponent.aggression", self.aggression),
            ("opponent.tightness", self.tightness),
            ("opponent.bluff_frequency", self.bluff_frequency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::state(field, format!("{} is out of range [0, 1]", value)));
            }
        }
        if !(self.recent_bet_pct.is_finite() && self.recent_bet_pct >= 0.0) {
            return Err(EngineError::state(
                "opponent.recent_bet_pct",
                format!("{} must be finite and non-negative", self.recent_bet_pct),
            ));
        }
        Ok(())
    }
}

/// Everything known at hero's decision point.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Hero's hole cards.
    pub hero: HoleCards,
    /// Community cards.
    pub board: Board,
    /// Current street; must agree with the board.
    pub street: Street,
    /// Chips in the pot before hero acts.
    pub pot: f64,
    /// Amount hero must put in to continue.
    pub to_call: f64,
    /// Hero's remaining stack.
    pub hero_stack: f64,
    /// Largest remaining opponent stack.
    pub villain_stack: f64,
    /// Chips hero has already put in this hand.
    pub invested: f64,
    /// Hero's seat.
    pub position: Position,
    /// Opponents still in the hand.
    pub num_opponents: usize,
    /// Empty (random), one range shared by all opponents, or one per opponent.
    pub opponent_ranges: Vec<WeightedRange>,
    /// Opponent tendencies; configured defaults when absent.
    pub opponent: Option<OpponentProfile>,
}

impl GameState {
    /// A heads-up state against a random range with no prior investment.
    pub fn new(hero: HoleCards, board: Board, position: Position, pot: f64, to_call: f64, stack: f64) -> Self {
        let street = board.street();
        Self {
            hero,
            board,
            street,
            pot,
            to_call,
            hero_stack: stack,
            villain_stack: stack,
            invested: 0.0,
            position,
            num_opponents: 1,
            opponent_ranges: Vec::new(),
            opponent: None,
        }
    }

    /// Builder method: set both stacks.
    pub fn with_stacks(mut self, hero_stack: f64, villain_stack: f64) -> Self {
        self.hero_stack = hero_stack;
        self.villain_stack = villain_stack;
        self
    }

    /// Builder method: set hero's prior investment.
    pub fn with_invested(mut self, invested: f64) -> Self {
        self.invested = invested;
        self
    }

    /// Builder method: set the opponents' shared range.
    pub fn with_range(mut self, range: WeightedRange) -> Self {
        self.opponent_ranges = vec![range];
        self
    }

    /// Builder method: set the number of opponents.
    pub fn with_opponents(mut self, num_opponents: usize) -> Self {
        self.num_opponents = num_opponents;
        self
    }

    /// Builder method: set the opponent profile.
    pub fn with_profile(mut self, profile: OpponentProfile) -> Self {
        self.opponent = Some(profile);
        self
    }

    /// Check the state describes a playable decision.
    pub fn validate(&self) -> Result<()> {
        self.street.check_board(&self.board)?;
        if let Some(card) = self.hero.cards().into_iter().find(|&c| self.board.contains(c)) {
            return Err(EngineError::hand("hero", format!("card {} also appears on the board", card)));
        }

        if !(self.pot.is_finite() && self.pot > 0.0) {
            return Err(EngineError::state("pot", format!("{} must be finite and positive", self.pot)));
        }
        for (field, value) in [
            ("to_call", self.to_call),
            ("hero_stack", self.hero_stack),
            ("villain_stack", self.villain_stack),
            ("invested", self.invested),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::state(field, format!("{} must be finite and non-negative", value)));
            }
        }

        if self.num_opponents == 0 {
            return Err(EngineError::state("num_opponents", "at least one opponent is required"));
        }
        if self.num_opponents > MAX_OPPONENTS {
            return Err(EngineError::state(
                "num_opponents",
                format!("{} opponents exceed the limit of {}", self.num_opponents, MAX_OPPONENTS),
            ));
        }
        let ranges = self.opponent_ranges.len();
        if ranges > 1 && ranges != self.num_opponents {
            return Err(EngineError::state(
                "opponent_ranges",
                format!("{} ranges given for {} opponents", ranges, self.num_opponents),
            ));
        }

        if let Some(profile) = &self.opponent {
            profile.validate()?;
        }
        Ok(())
    }

    /// The smaller of the two stacks.
    pub fn effective_stack(&self) -> f64 {
        self.hero_stack.min(self.villain_stack)
    }

    /// Supplied profile, or the configured defaults.
    pub fn profile(&self, config: &FactorConfig) -> OpponentProfile {
        self.opponent.unwrap_or_else(|| OpponentProfile::from_config(config))
    }

    /// One range per opponent.
    pub fn resolved_ranges(&self) -> Vec<WeightedRange> {
        match self.opponent_ranges.as_slice() {
            [] => vec![WeightedRange::random(); self.num_opponents],
            [shared] => vec![shared.clone(); self.num_opponents],
            many => many.to_vec(),
        }
    }

    /// The equity question this state poses.
    pub fn equity_query(&self, iterations: usize) -> EquityQuery {
        EquityQuery {
            hero: self.hero,
            board: self.board.clone(),
            opponents: self.resolved_ranges(),
            iterations: Some(iterations),
            method: MethodPreference::Auto,
        }
    }
}
