//! Cards and hand evaluation.
//!
//! ## Modules
//!
//! - `card`: Card, card set, hole cards, board, street and deck representations
//! - `hand_eval`: Poker hand evaluation and percentile ranking

pub mod card;
pub mod hand_eval;

// Re-export commonly used types
pub use card::{parse_cards, Board, Card, CardSet, Deck, HoleCards, Street};
pub use hand_eval::{HandCategory, HandEvaluator, HandRank, HandValue, MadeHand};
