//! Board texture and drawing outs.

use serde::{Deserialize, Serialize};

use crate::cards::card::RANK_A;
use crate::cards::{Board, Card, HoleCards, Street};

/// How coordinated the community cards are.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardTexture {
    /// Three or more cards of one suit.
    pub flush_possible: bool,
    /// Three distinct ranks within a five-rank window.
    pub straight_possible: bool,
    /// At least two cards share a rank.
    pub paired: bool,
    /// 1 for touching ranks, falling to 0 as the average gap reaches 5.
    pub connectivity: f64,
    /// Overall coordination score in [0, 1].
    pub wetness: f64,
}

impl BoardTexture {
    /// Analyze the board. An empty board is completely dry.
    pub fn analyze(board: &Board) -> Self {
        let cards = board.cards();
        if cards.is_empty() {
            return Self::default();
        }

        let mut suit_counts = [0u8; 4];
        let mut rank_counts = [0u8; 13];
        for card in cards {
            suit_counts[card.suit() as usize] += 1;
            rank_counts[card.rank() as usize] += 1;
        }

        let flush_possible = suit_counts.iter().any(|&n| n >= 3);
        let paired = rank_counts.iter().any(|&n| n >= 2);

        let ranks: Vec<u8> = (0..13u8).filter(|&r| rank_counts[r as usize] > 0).collect();
        let straight_possible = ranks.windows(3).any(|w| w[2] - w[0] <= 4);

        let connectivity = if ranks.len() >= 2 {
            let span = (ranks[ranks.len() - 1] - ranks[0]) as f64;
            let avg_gap = span / (ranks.len() - 1) as f64;
            (1.0 - (avg_gap - 1.0) / 4.0).max(0.0)
        } else {
            0.0
        };

        let mut wetness = 0.0;
        if flush_possible {
            wetness += 0.3;
        }
        if straight_possible {
            wetness += 0.3;
        }
        if paired {
            wetness += 0.2;
        }
        wetness += connectivity * 0.2;

        Self {
            flush_possible,
            straight_possible,
            paired,
            connectivity,
            wetness: wetness.min(1.0),
        }
    }
}

/// Kind of straight draw held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StraightDraw {
    None,
    Gutshot,
    OpenEnded,
}

/// Draws hero holds with cards still to come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draws {
    pub flush_draw: bool,
    pub straight_draw: StraightDraw,
    /// Cards that complete a draw.
    pub outs: u8,
}

impl Draws {
    /// Count drawing outs on the flop or turn. Preflop and river have none.
    pub fn count(hero: &HoleCards, board: &Board) -> Self {
        let none = Self {
            flush_draw: false,
            straight_draw: StraightDraw::None,
            outs: 0,
        };
        if !matches!(board.street(), Street::Flop | Street::Turn) {
            return none;
        }

        let cards: Vec<Card> = hero.cards().iter().chain(board.cards()).copied().collect();

        let mut suit_counts = [0u8; 4];
        for card in &cards {
            suit_counts[card.suit() as usize] += 1;
        }
        // Four to a flush counts only when hero holds one of them
        let flush_draw = hero
            .cards()
            .iter()
            .any(|card| suit_counts[card.suit() as usize] == 4);

        let board_bits = rank_bits(board.cards());
        let bits = board_bits | rank_bits(&hero.cards());
        let straight_draw = straight_draw(bits, bits & !board_bits);

        let mut outs = 0;
        if flush_draw {
            outs += 9;
        }
        outs += match straight_draw {
            StraightDraw::OpenEnded => 8,
            StraightDraw::Gutshot => 4,
            StraightDraw::None => 0,
        };

        Self {
            flush_draw,
            straight_draw,
            outs,
        }
    }
}

/// 14-bit rank mask with the ace also in bit 0.
fn rank_bits(cards: &[Card]) -> u16 {
    cards.iter().fold(0, |bits, card| {
        let bits = bits | 1 << (card.rank() + 1);
        if card.rank() == RANK_A {
            bits | 1
        } else {
            bits
        }
    })
}

/// Classify a straight draw from a 14-bit rank mask (bit 0 = low ace).
///
/// `hero_bits` are the ranks only hero contributes; a draw must use one.
fn straight_draw(bits: u16, hero_bits: u16) -> StraightDraw {
    let window = |mask: u16, low: u32, len: u32| (mask >> low) & ((1 << len) - 1);

    // Already made
    if (0..=9).any(|low| window(bits, low, 5) == 0b11111) {
        return StraightDraw::None;
    }
    // Four consecutive ranks with room on both ends
    if (1..=9).any(|low| window(bits, low, 4) == 0b1111 && window(hero_bits, low, 4) != 0) {
        return StraightDraw::OpenEnded;
    }
    // Four of five ranks in a five-rank window, including A-2-3-4 and J-Q-K-A
    if (0..=9).any(|low| window(bits, low, 5).count_ones() == 4 && window(hero_bits, low, 5) != 0) {
        return StraightDraw::Gutshot;
    }
    StraightDraw::None
}

/// Probability that at least one out arrives by the river.
pub fn draw_probability(outs: u8, street: Street) -> f64 {
    if outs == 0 {
        return 0.0;
    }
    let outs = outs as f64;
    match street {
        // 47 unseen cards, two to come
        Street::Flop => 1.0 - ((47.0 - outs) * (46.0 - outs)) / (47.0 * 46.0),
        // 46 unseen cards, one to come
        Street::Turn => outs / 46.0,
        Street::Preflop | Street::River => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        Board::parse(s).unwrap()
    }

    fn hole(s: &str) -> HoleCards {
        HoleCards::parse(s).unwrap()
    }

    #[test]
    fn test_dry_and_empty_boards() {
        let empty = BoardTexture::analyze(&Board::new());
        assert_eq!(empty.wetness, 0.0);
        assert!(!empty.flush_possible && !empty.straight_possible && !empty.paired);

        let dry = BoardTexture::analyze(&board("Kd 7c 2s"));
        assert!(!dry.flush_possible && !dry.straight_possible && !dry.paired);
        assert!(dry.wetness < 0.1);
    }

    #[test]
    fn test_wet_board() {
        let wet = BoardTexture::analyze(&board("Jh Th 9h"));
        assert!(wet.flush_possible);
        assert!(wet.straight_possible);
        assert!(!wet.paired);
        assert_eq!(wet.connectivity, 1.0);
        assert!((wet.wetness - 0.8).abs() < 1e-12);

        let paired = BoardTexture::analyze(&board("8s 8d 3c"));
        assert!(paired.paired);
        assert!(paired.wetness >= 0.2);
    }

    #[test]
    fn test_wetness_bounded() {
        let texture = BoardTexture::analyze(&board("9h 9s Th Jh Qh"));
        assert!(texture.wetness <= 1.0);
        assert!(texture.flush_possible && texture.straight_possible && texture.paired);
    }

    #[test]
    fn test_flush_and_straight_draws() {
        let draws = Draws::count(&hole("Ah Kh"), &board("7h 2h Qc"));
        assert!(draws.flush_draw);
        assert_eq!(draws.straight_draw, StraightDraw::None);
        assert_eq!(draws.outs, 9);

        let draws = Draws::count(&hole("9c 8d"), &board("7h 6s Kc"));
        assert_eq!(draws.straight_draw, StraightDraw::OpenEnded);
        assert_eq!(draws.outs, 8);

        let draws = Draws::count(&hole("9c 8d"), &board("6h 5s Kc"));
        assert_eq!(draws.straight_draw, StraightDraw::Gutshot);
        assert_eq!(draws.outs, 4);

        // Combo draw
        let draws = Draws::count(&hole("9h 8h"), &board("7h 6s 2h"));
        assert_eq!(draws.outs, 17);
    }

    #[test]
    fn test_board_only_draws_are_not_hero_draws() {
        // Four hearts and four to a straight on board, none in hero's hand
        let draws = Draws::count(&hole("Ac Kd"), &board("9h 8h 7h 6h"));
        assert!(!draws.flush_draw);
        assert_eq!(draws.straight_draw, StraightDraw::None);
        assert_eq!(draws.outs, 0);

        // One heart in hand joins three on board
        let draws = Draws::count(&hole("Ah 2c"), &board("Kh 7h 3h"));
        assert!(draws.flush_draw);
        assert_eq!(draws.outs, 9);

        // A paired rank adds nothing to the board's straight draw
        let draws = Draws::count(&hole("9c 2d"), &board("9h 8s 7c 6d"));
        assert_eq!(draws.straight_draw, StraightDraw::None);
    }

    #[test]
    fn test_wheel_and_broadway_draws() {
        // A-2-3-4 needs a five
        let draws = Draws::count(&hole("Ac 2d"), &board("3h 4s Kc"));
        assert_eq!(draws.straight_draw, StraightDraw::Gutshot);

        // J-Q-K-A needs a ten
        let draws = Draws::count(&hole("Ac Kd"), &board("Qh Js 3c"));
        assert_eq!(draws.straight_draw, StraightDraw::Gutshot);
    }

    #[test]
    fn test_made_hands_have_no_draw_outs() {
        let draws = Draws::count(&hole("As Kh"), &board("Qd Jc Ts"));
        assert_eq!(draws.straight_draw, StraightDraw::None);

        let river = Draws::count(&hole("9h 8h"), &board("7h 6s 2h Kd 3c"));
        assert_eq!(river.outs, 0);
        let preflop = Draws::count(&hole("9h 8h"), &Board::new());
        assert_eq!(preflop.outs, 0);
    }

    #[test]
    fn test_draw_probability() {
        // Nine outs twice: 1 - (38 * 37) / (47 * 46)
        let flop = draw_probability(9, Street::Flop);
        assert!((flop - 0.34968).abs() < 1e-4);
        assert!((draw_probability(9, Street::Turn) - 9.0 / 46.0).abs() < 1e-12);
        assert_eq!(draw_probability(9, Street::River), 0.0);
        assert_eq!(draw_probability(0, Street::Flop), 0.0);
        assert!(draw_probability(47, Street::Flop) <= 1.0);
    }
}
