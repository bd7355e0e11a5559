//! # QPDS Engine
//!
//! A quantitative poker decision engine: given hero's hole cards, the board,
//! the betting situation and a risk preference, recommend fold, check, call,
//! bet or raise with an amount, expected value, confidence and the factors
//! behind the choice.
//!
//! ## Features
//!
//! - **Hand Evaluation**: Best five-card rank of 5-7 cards, with category and percentile
//! - **Equity**: Exact enumeration when small enough, seeded parallel Monte Carlo otherwise
//! - **Weighted Ranges**: Compact notation (`"TT+, AQs+, KQs:0.5"`) or explicit combos
//! - **Factor Scoring**: Fourteen range-checked factors from the state and one equity estimate
//! - **Risk-Adjusted Decisions**: EV against a pot-odds threshold shifted by risk preference
//!
//! ## Quick Start
//!
//! ```
//! use qpds_engine::cards::{Board, HoleCards};
//! use qpds_engine::config::EquityConfig;
//! use qpds_engine::engine::{DecisionEngine, FactorEngine, GameState, Position};
//! use qpds_engine::equity::EquityCalculator;
//!
//! let hero = HoleCards::parse("AsKh").unwrap();
//! let board = Board::parse("Qd Jc Ts").unwrap();
//! let state = GameState::new(hero, board, Position::BTN, 100.0, 20.0, 500.0);
//!
//! let mut calculator = EquityCalculator::seeded(EquityConfig::default(), 7);
//! let factors = FactorEngine::default().compute(&state, &mut calculator, 5_000).unwrap();
//! let recommendation = DecisionEngine::default().decide(&factors, 5.0).unwrap();
//! println!("{} {:.1}", recommendation.action, recommendation.amount);
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: Cards, boards, decks and the hand evaluator
//! - [`range`]: Weighted ranges and range notation
//! - [`equity`]: Exact and Monte Carlo equity
//! - [`engine`]: Game state, factors and the decision policy
//! - [`api`]: Request/response contracts and the [`Advisor`](api::Advisor)
//! - [`config`]: Tunable constants, loadable from JSON
//! - [`error`]: The crate error type
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Advisor (api)                         │
//! │  - Parse cards/ranges      - Validate the game state     │
//! └──────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//!   │ FactorEngine  │──▶│EquityCalculator│  │DecisionEngine │
//!   │  14 factors   │   │ exact / MC    │   │ EV + threshold│
//!   └───────────────┘   └───────────────┘   └───────────────┘
//!           │                   │                   ▲
//!           ▼                   ▼                   │
//!   ┌───────────────┐   ┌───────────────┐           │
//!   │ HandEvaluator │   │ WeightedRange │      FactorSet
//!   └───────────────┘   └───────────────┘
//! ```

pub mod api;
pub mod cards;
pub mod config;
pub mod engine;
pub mod equity;
pub mod error;
pub mod range;

// Re-export commonly used types at crate root for convenience
pub use api::{Advisor, DecisionRequest, DecisionResponse, EquityRequest, EquityResponse};
pub use cards::{Board, Card, HandEvaluator, HoleCards, Street};
pub use config::EngineConfig;
pub use engine::{Action, DecisionEngine, FactorEngine, FactorSet, GameState, Position, Recommendation};
pub use equity::{EquityCalculator, EquityResult};
pub use error::{EngineError, Result};
