//! Factor and decision engines.
//!
//! ## Modules
//!
//! - `state`: Decision-point game state, positions and opponent profiles
//! - `texture`: Board texture and drawing outs
//! - `factors`: Factor names, range-checked values and the immutable factor set
//! - `factor_engine`: Static and equity-dependent factor computation
//! - `decision`: EV and threshold policy producing a recommendation

pub mod decision;
pub mod factor_engine;
pub mod factors;
pub mod state;
pub mod texture;

// Re-export commonly used types
pub use decision::{call_ev, Action, DecisionEngine, FactorReason, Recommendation};
pub use factor_engine::{preflop_strength, FactorEngine};
pub use factors::{BettingContext, FactorKind, FactorName, FactorSet, FactorValue};
pub use state::{GameState, OpponentProfile, Position, MAX_OPPONENTS};
pub use texture::{BoardTexture, Draws, StraightDraw};
