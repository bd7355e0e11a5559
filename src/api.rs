//! Request and response contracts.
//!
//! Everything a front end exchanges with the engine: card strings, range
//! specifications and betting amounts go in, plain serializable results come
//! out. [`Advisor`] validates requests and runs the pipeline
//! (game state → factors → recommendation).
//!
//! # Example
//! ```
//! use qpds_engine::api::{Advisor, DecisionRequest};
//! use qpds_engine::engine::Action;
//!
//! let request: DecisionRequest = serde_json::from_str(r#"{
//!     "hero": ["As", "Kh"],
//!     "board": ["Qd", "Jc", "Ts"],
//!     "pot": 100, "to_call": 20,
//!     "hero_stack": 500, "villain_stack": 500,
//!     "position": "BTN", "risk_preference": 5,
//!     "seed": 1
//! }"#).unwrap();
//!
//! let response = Advisor::default().decide(&request).unwrap();
//! assert_eq!(response.action, Action::Raise);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::{Board, Card, HandCategory, HandEvaluator, HoleCards, Street};
use crate::config::EngineConfig;
use crate::engine::{
    Action, DecisionEngine, FactorEngine, FactorReason, FactorValue, GameState, OpponentProfile, Position,
};
use crate::equity::{EquityCalculator, EquityMethod, EquityQuery, EquityResult, MethodPreference};
use crate::error::{EngineError, Result};
use crate::range::{WeightedCombo, WeightedRange};

/// An opponent range: compact notation or an explicit weighted list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeSpec {
    /// e.g. `"TT+, AQs+, KQs:0.5"`, or `"random"`.
    Notation(String),
    /// e.g. `[{"combo": "AsKh", "weight": 0.5}]`.
    Combos(Vec<WeightedCombo>),
}

impl RangeSpec {
    /// Build the weighted range, naming `field` in any error.
    pub fn resolve(&self, field: &str) -> Result<WeightedRange> {
        match self {
            RangeSpec::Notation(notation) => WeightedRange::parse(field, notation),
            RangeSpec::Combos(combos) => {
                let range = WeightedRange::from_weighted(field, combos.iter().map(|c| (c.combo, c.weight)))?;
                if range.is_empty() {
                    return Err(EngineError::range(field, "no combination carries weight"));
                }
                Ok(range)
            }
        }
    }
}

impl From<&str> for RangeSpec {
    fn from(notation: &str) -> Self {
        RangeSpec::Notation(notation.to_string())
    }
}

/// Equity of a hand against one or more ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRequest {
    pub hero: Vec<String>,
    #[serde(default)]
    pub board: Vec<String>,
    /// One range per opponent; empty means one random opponent.
    #[serde(default)]
    pub opponents: Vec<RangeSpec>,
    #[serde(default)]
    pub iterations: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub method: Option<MethodPreference>,
}

/// Equity estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityResponse {
    pub equity: f64,
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    pub iterations: u64,
    pub method: EquityMethod,
    pub std_error: f64,
    pub converged: bool,
    pub timed_out: bool,
}

impl From<&EquityResult> for EquityResponse {
    fn from(result: &EquityResult) -> Self {
        Self {
            equity: result.equity,
            win: result.win,
            tie: result.tie,
            loss: result.loss,
            iterations: result.iterations,
            method: result.method,
            std_error: result.std_error,
            converged: result.converged,
            timed_out: result.timed_out,
        }
    }
}

/// A single decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub hero: Vec<String>,
    #[serde(default)]
    pub board: Vec<String>,
    /// Derived from the board when absent; must agree with it when present.
    #[serde(default)]
    pub street: Option<Street>,
    pub pot: f64,
    pub to_call: f64,
    pub hero_stack: f64,
    pub villain_stack: f64,
    /// Chips hero has already put in this hand.
    #[serde(default)]
    pub invested: Option<f64>,
    pub position: Position,
    /// 0 (cautious) to the configured maximum (aggressive).
    pub risk_preference: f64,
    /// Shared by every opponent; random when absent.
    #[serde(default)]
    pub opponent_range: Option<RangeSpec>,
    #[serde(default)]
    pub num_opponents: Option<usize>,
    #[serde(default)]
    pub opponent: Option<OpponentProfile>,
    #[serde(default)]
    pub iterations: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Recommendation with the factors and equity behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub action: Action,
    pub amount: f64,
    pub all_in: bool,
    pub expected_value: f64,
    pub confidence: f64,
    pub required_equity: f64,
    pub pot_committed: bool,
    pub explanation: Vec<FactorReason>,
    /// Every factor, in reporting order.
    pub factors: Vec<FactorValue>,
    pub equity: EquityResponse,
}

/// Evaluate a made hand of 5 to 7 cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub cards: Vec<String>,
}

/// Category and strength of a made hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub category: HandCategory,
    /// Comparable across hands; higher is stronger.
    pub rank_value: u32,
    /// Share of same-size hands this hand beats, in [0, 1].
    pub percentile: f64,
    /// Ranks deciding ties within the category, most significant first.
    pub tiebreakers: Vec<char>,
}

/// Validates requests and runs them through the engines.
///
/// Holds only configuration; every call builds its own calculator, so one
/// advisor can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Advisor {
    config: EngineConfig,
}

impl Advisor {
    /// Create an advisor, rejecting an invalid configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate 5 to 7 cards.
    pub fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluateResponse> {
        let cards = request
            .cards
            .iter()
            .map(|s| parse_card(s).ok_or_else(|| EngineError::hand("cards", format!("invalid card '{}'", s))))
            .collect::<Result<Vec<_>>>()?;

        let value = HandEvaluator::new().evaluate(&cards)?;
        Ok(EvaluateResponse {
            category: value.category(),
            rank_value: value.rank.value(),
            percentile: value.percentile,
            tiebreakers: value.tiebreaker_chars(),
        })
    }

    /// Hero's equity against the requested opponents.
    pub fn equity(&self, request: &EquityRequest) -> Result<EquityResponse> {
        let hero = parse_hero(&request.hero)?;
        let board = parse_board(&request.board)?;

        let opponents = if request.opponents.is_empty() {
            vec![WeightedRange::random()]
        } else {
            request
                .opponents
                .iter()
                .enumerate()
                .map(|(i, spec)| spec.resolve(&format!("opponents[{}]", i)))
                .collect::<Result<Vec<_>>>()?
        };

        let mut query = EquityQuery::new(hero, board, opponents)
            .with_method(request.method.unwrap_or_default());
        query.iterations = request.iterations;

        let result = self.calculator(request.seed).calculate(&query)?;
        Ok(EquityResponse::from(&result))
    }

    /// Recommend an action for a decision point.
    pub fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse> {
        let decision_engine = DecisionEngine::new(self.config.decision.clone());
        decision_engine.check_risk(request.risk_preference)?;

        let state = self.game_state(request)?;
        let iterations = request.iterations.unwrap_or(self.config.decision.iterations);

        let mut calculator = self.calculator(request.seed);
        let factors = FactorEngine::new(self.config.factors.clone()).compute(&state, &mut calculator, iterations)?;
        let recommendation = decision_engine.decide(&factors, request.risk_preference)?;

        Ok(DecisionResponse {
            action: recommendation.action,
            amount: recommendation.amount,
            all_in: recommendation.all_in,
            expected_value: recommendation.expected_value,
            confidence: recommendation.confidence,
            required_equity: recommendation.required_equity,
            pot_committed: recommendation.pot_committed,
            explanation: recommendation.explanation,
            factors: factors.ordered(),
            equity: EquityResponse::from(factors.equity()),
        })
    }

    /// Validated game state for a decision request.
    pub fn game_state(&self, request: &DecisionRequest) -> Result<GameState> {
        let hero = parse_hero(&request.hero)?;
        let board = parse_board(&request.board)?;
        let street = request.street.unwrap_or_else(|| board.street());

        let opponent_ranges = match &request.opponent_range {
            Some(spec) => vec![spec.resolve("opponent_range")?],
            None => Vec::new(),
        };

        let state = GameState {
            hero,
            board,
            street,
            pot: request.pot,
            to_call: request.to_call,
            hero_stack: request.hero_stack,
            villain_stack: request.villain_stack,
            invested: request.invested.unwrap_or(0.0),
            position: request.position,
            num_opponents: request.num_opponents.unwrap_or(1),
            opponent_ranges,
            opponent: request.opponent,
        };
        state.validate()?;
        Ok(state)
    }

    fn calculator(&self, seed: Option<u64>) -> EquityCalculator {
        match seed.or(self.config.equity.seed) {
            Some(seed) => EquityCalculator::seeded(self.config.equity.clone(), seed),
            None => EquityCalculator::from_entropy(self.config.equity.clone()),
        }
    }
}

fn parse_card(s: &str) -> Option<Card> {
    Card::parse(s.trim())
}

/// Exactly two distinct hole cards.
fn parse_hero(cards: &[String]) -> Result<HoleCards> {
    if cards.len() != 2 {
        return Err(EngineError::hand(
            "hero",
            format!("expected exactly 2 hole cards, received {}", cards.len()),
        ));
    }
    let parse = |s: &String| parse_card(s).ok_or_else(|| EngineError::hand("hero", format!("invalid card '{}'", s)));
    HoleCards::try_new(parse(&cards[0])?, parse(&cards[1])?)
}

/// 0, 3, 4 or 5 distinct community cards.
fn parse_board(cards: &[String]) -> Result<Board> {
    let cards = cards
        .iter()
        .map(|s| parse_card(s).ok_or_else(|| EngineError::board("board", format!("invalid card '{}'", s))))
        .collect::<Result<Vec<_>>>()?;
    Board::from_cards(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DecisionConfig, EquityConfig};
    use crate::engine::FactorName;

    fn strings(cards: &[&str]) -> Vec<String> {
        cards.iter().map(|s| s.to_string()).collect()
    }

    fn decision_request(hero: &[&str], board: &[&str], to_call: f64) -> DecisionRequest {
        DecisionRequest {
            hero: strings(hero),
            board: strings(board),
            street: None,
            pot: 100.0,
            to_call,
            hero_stack: 500.0,
            villain_stack: 500.0,
            invested: None,
            position: Position::BTN,
            risk_preference: 5.0,
            opponent_range: None,
            num_opponents: None,
            opponent: None,
            iterations: Some(5_000),
            seed: Some(2024),
        }
    }

    fn advisor() -> Advisor {
        let equity = EquityConfig::default().with_convergence(None).with_max_time_ms(None);
        Advisor::new(EngineConfig::default().with_equity(equity)).unwrap()
    }

    #[test]
    fn test_nut_straight_raises() {
        let request = decision_request(&["As", "Kh"], &["Qd", "Jc", "Ts"], 20.0);
        let response = advisor().decide(&request).unwrap();

        assert!(response.equity.equity > 0.85, "equity {}", response.equity.equity);
        assert_eq!(response.action, Action::Raise);
        assert!(response.amount > 20.0);
        assert!(response.expected_value > 0.0);
        assert!(response.confidence > 0.7, "confidence {}", response.confidence);
        assert_eq!(response.factors.len(), FactorName::ALL.len());
        assert_eq!(response.factors[0].name, FactorName::HandStrength);
    }

    #[test]
    fn test_checked_to_never_folds() {
        for hero in [["7c", "2d"], ["As", "Ah"], ["9h", "8h"]] {
            let request = decision_request(&hero, &["Kd", "Qs", "3c"], 0.0);
            let response = advisor().decide(&request).unwrap();
            assert_ne!(response.action, Action::Fold);
        }
    }

    #[test]
    fn test_seeded_decisions_repeat() {
        let request = decision_request(&["Jh", "Th"], &["9h", "2c", "Kd"], 40.0);
        let a = advisor().decide(&request).unwrap();
        let b = advisor().decide(&request).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_cards_rejected() {
        let request = decision_request(&["As", "Kh"], &["As", "Jc", "Ts"], 20.0);
        assert!(matches!(
            advisor().decide(&request),
            Err(EngineError::InvalidHand { field: "hero", .. })
        ));

        let equity = EquityRequest {
            hero: strings(&["As", "Kh"]),
            board: strings(&["Qd", "Kh", "Ts"]),
            opponents: vec![],
            iterations: Some(100),
            seed: Some(1),
            method: None,
        };
        assert!(matches!(
            advisor().equity(&equity),
            Err(EngineError::InvalidHand { field: "hero", .. })
        ));

        let request = decision_request(&["As", "As"], &[], 20.0);
        assert!(matches!(advisor().decide(&request), Err(EngineError::InvalidHand { .. })));

        let request = decision_request(&["As", "Kh"], &["Qd", "Qd", "Ts"], 20.0);
        assert!(matches!(advisor().decide(&request), Err(EngineError::InvalidBoard { .. })));
    }

    #[test]
    fn test_board_and_street_validation() {
        let request = decision_request(&["As", "Kh"], &["Qd", "Jc"], 20.0);
        assert!(matches!(advisor().decide(&request), Err(EngineError::InvalidBoard { .. })));

        let mut request = decision_request(&["As", "Kh"], &["Qd", "Jc", "Ts"], 20.0);
        request.street = Some(Street::Turn);
        assert!(matches!(
            advisor().decide(&request),
            Err(EngineError::InvalidBoard { field: "street", .. })
        ));

        let request = decision_request(&["As", "Kh"], &["Qd", "Jc", "Tx"], 20.0);
        assert!(matches!(
            advisor().decide(&request),
            Err(EngineError::InvalidBoard { field: "board", .. })
        ));
    }

    #[test]
    fn test_invalid_risk_and_state() {
        let mut request = decision_request(&["As", "Kh"], &["Qd", "Jc", "Ts"], 20.0);
        request.risk_preference = 11.0;
        assert!(matches!(
            advisor().decide(&request),
            Err(EngineError::InvalidRiskPreference { .. })
        ));

        let mut request = decision_request(&["As", "Kh"], &["Qd", "Jc", "Ts"], 20.0);
        request.pot = 0.0;
        assert!(matches!(
            advisor().decide(&request),
            Err(EngineError::InvalidState { field: "pot", .. })
        ));

        let mut request = decision_request(&["As", "Kh"], &["Qd", "Jc", "Ts"], 20.0);
        request.opponent_range = Some("AsAh".into());
        request.hero = strings(&["As", "Ah"]);
        assert!(matches!(
            advisor().decide(&request),
            Err(EngineError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_opponent_count_is_bounded() {
        let mut request = decision_request(&["As", "Kh"], &["Qd", "Jc", "Ts"], 20.0);
        request.num_opponents = Some(23);
        assert!(matches!(
            advisor().decide(&request),
            Err(EngineError::InvalidState { field: "num_opponents", .. })
        ));

        let request: DecisionRequest = serde_json::from_str(
            r#"{
                "hero": ["As", "Kh"], "board": ["Qd", "Jc", "Ts"],
                "pot": 100, "to_call": 20, "hero_stack": 500, "villain_stack": 500,
                "position": "BTN", "risk_preference": 5,
                "num_opponents": 1152921504606846976
            }"#,
        )
        .unwrap();
        assert!(matches!(
            Advisor::default().decide(&request),
            Err(EngineError::InvalidState { field: "num_opponents", .. })
        ));
    }

    #[test]
    fn test_equity_request() {
        let request: EquityRequest = serde_json::from_str(
            r#"{
                "hero": ["As", "Ah"],
                "opponents": ["KK"],
                "iterations": 20000,
                "seed": 5,
                "method": "monte_carlo"
            }"#,
        )
        .unwrap();
        let response = advisor().equity(&request).unwrap();
        assert_eq!(response.method, EquityMethod::MonteCarlo);
        assert_eq!(response.iterations, 20_000);
        assert!((response.equity - 0.82).abs() < 0.02);
    }

    #[test]
    fn test_equity_against_explicit_combos() {
        let request: EquityRequest = serde_json::from_str(
            r#"{
                "hero": ["Ks", "Kd"],
                "board": ["7c", "7d", "2h", "3s", "9c"],
                "opponents": [[{"combo": "AhAd", "weight": 1.0}, {"combo": "QcQh"}]]
            }"#,
        )
        .unwrap();
        let response = advisor().equity(&request).unwrap();
        assert_eq!(response.method, EquityMethod::Exact);
        assert!((response.equity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate() {
        let request = EvaluateRequest {
            cards: strings(&["Ah", "Kh", "Qh", "Jh", "Th", "2c", "3d"]),
        };
        let response = advisor().evaluate(&request).unwrap();
        assert_eq!(response.category, HandCategory::StraightFlush);
        assert_eq!(response.tiebreakers, vec!['A']);
        assert!(response.percentile > 0.99);

        let bad = EvaluateRequest {
            cards: strings(&["Ah", "Kh", "Qh", "Jh"]),
        };
        assert!(matches!(advisor().evaluate(&bad), Err(EngineError::InvalidHand { .. })));
    }

    #[test]
    fn test_range_spec_serde() {
        let notation: RangeSpec = serde_json::from_str("\"TT+, AKs\"").unwrap();
        assert_eq!(notation.resolve("r").unwrap().len(), 34);

        let combos: RangeSpec = serde_json::from_str(r#"[{"combo": "AsKh", "weight": 0.5}]"#).unwrap();
        let range = combos.resolve("r").unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.combos()[0].weight, 0.5);

        let empty = RangeSpec::Combos(vec![]);
        assert!(empty.resolve("r").is_err());
    }

    #[test]
    fn test_multiway_decision() {
        let mut request = decision_request(&["Ah", "Ad"], &["Kc", "7d", "2s"], 30.0);
        request.num_opponents = Some(3);
        request.opponent_range = Some("22+, AK, KQ".into());
        let response = advisor().decide(&request).unwrap();
        assert!(response.equity.equity > 0.4);
        assert_ne!(response.action, Action::Fold);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default().with_decision(DecisionConfig::default().with_alpha(2.0));
        assert!(matches!(Advisor::new(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_advisor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Advisor>();
    }
}
