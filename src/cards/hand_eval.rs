//! Poker hand evaluation.
//!
//! This module provides hand ranking and comparison for 5-7 card poker hands.
//! The evaluator works on per-suit rank bitmasks and rank counts, checking
//! categories from strongest to weakest with early exit, so a 7-card hand is
//! ranked directly instead of trying all 21 five-card subsets.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::card::{Card, CardSet, RANK_5, RANK_CHARS};
use crate::error::{EngineError, Result};

/// Hand rank categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    /// All categories, worst first.
    pub const ALL: [HandCategory; 9] = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
    ];

    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }

    fn from_index(index: u32) -> Self {
        Self::ALL[(index as usize).min(8)]
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of distinct hands per category, indexed by `HandCategory as usize`.
const FIVE_CARD_COUNTS: [u64; 9] = [
    1_302_540, 1_098_240, 123_552, 54_912, 10_200, 5_108, 3_744, 624, 40,
];
const SIX_CARD_COUNTS: [u64; 9] = [
    6_612_900, 9_730_740, 2_532_816, 732_160, 361_620, 205_792, 165_984, 14_664, 1_844,
];
const SEVEN_CARD_COUNTS: [u64; 9] = [
    23_294_460, 58_627_800, 31_433_400, 6_461_620, 6_180_020, 4_047_644, 3_473_184, 224_848,
    41_584,
];

/// A made hand: the category together with its ordered tie-break ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MadeHand {
    HighCard([u8; 5]),
    OnePair { pair: u8, kickers: [u8; 3] },
    TwoPair { high: u8, low: u8, kicker: u8 },
    ThreeOfAKind { trips: u8, kickers: [u8; 2] },
    /// `high` is the top card; the wheel has high card 5.
    Straight { high: u8 },
    Flush([u8; 5]),
    FullHouse { trips: u8, pair: u8 },
    FourOfAKind { quads: u8, kicker: u8 },
    StraightFlush { high: u8 },
}

impl MadeHand {
    /// The category of this hand.
    pub fn category(&self) -> HandCategory {
        match self {
            MadeHand::HighCard(_) => HandCategory::HighCard,
            MadeHand::OnePair { .. } => HandCategory::OnePair,
            MadeHand::TwoPair { .. } => HandCategory::TwoPair,
            MadeHand::ThreeOfAKind { .. } => HandCategory::ThreeOfAKind,
            MadeHand::Straight { .. } => HandCategory::Straight,
            MadeHand::Flush(_) => HandCategory::Flush,
            MadeHand::FullHouse { .. } => HandCategory::FullHouse,
            MadeHand::FourOfAKind { .. } => HandCategory::FourOfAKind,
            MadeHand::StraightFlush { .. } => HandCategory::StraightFlush,
        }
    }

    /// Tie-break ranks in comparison order (grouping ranks first, then kickers).
    pub fn tiebreakers(&self) -> Vec<u8> {
        match *self {
            MadeHand::HighCard(k) | MadeHand::Flush(k) => k.to_vec(),
            MadeHand::OnePair { pair, kickers } => vec![pair, kickers[0], kickers[1], kickers[2]],
            MadeHand::TwoPair { high, low, kicker } => vec![high, low, kicker],
            MadeHand::ThreeOfAKind { trips, kickers } => vec![trips, kickers[0], kickers[1]],
            MadeHand::Straight { high } | MadeHand::StraightFlush { high } => vec![high],
            MadeHand::FullHouse { trips, pair } => vec![trips, pair],
            MadeHand::FourOfAKind { quads, kicker } => vec![quads, kicker],
        }
    }

    /// Pack into a comparable rank.
    pub fn rank(&self) -> HandRank {
        let category = self.category();
        match *self {
            MadeHand::HighCard(k) | MadeHand::Flush(k) => HandRank::new(category, &k),
            MadeHand::OnePair { pair, kickers } => {
                HandRank::new(category, &[pair, kickers[0], kickers[1], kickers[2]])
            }
            MadeHand::TwoPair { high, low, kicker } => HandRank::new(category, &[high, low, kicker]),
            MadeHand::ThreeOfAKind { trips, kickers } => {
                HandRank::new(category, &[trips, kickers[0], kickers[1]])
            }
            MadeHand::Straight { high } | MadeHand::StraightFlush { high } => {
                HandRank::new(category, &[high])
            }
            MadeHand::FullHouse { trips, pair } => HandRank::new(category, &[trips, pair]),
            MadeHand::FourOfAKind { quads, kicker } => HandRank::new(category, &[quads, kicker]),
        }
    }
}

/// A hand rank that can be compared.
/// Higher values are better hands.
/// Format: category (4 bits) | key1 (4 bits) | key2 (4 bits) | ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HandRank(u32);

impl HandRank {
    /// Create a new hand rank.
    fn new(category: HandCategory, keys: &[u8]) -> Self {
        let mut value = (category as u32) << 20;
        for (i, &k) in keys.iter().take(5).enumerate() {
            value |= (k as u32) << (16 - i * 4);
        }
        Self(value)
    }

    /// Get the raw rank value for comparison.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Get the hand category.
    pub fn category(&self) -> HandCategory {
        HandCategory::from_index(self.0 >> 20)
    }

    /// Tie-break portion of the rank.
    fn key(&self) -> u32 {
        self.0 & 0xF_FFFF
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Full evaluation result of a validated hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandValue {
    /// Comparable strength.
    pub rank: HandRank,
    /// Category with tie-break ranks.
    pub made: MadeHand,
    /// Percentile among all hands with the same number of cards.
    pub percentile: f64,
    /// Number of cards evaluated (5-7).
    pub card_count: usize,
}

impl HandValue {
    /// The hand category.
    pub fn category(&self) -> HandCategory {
        self.made.category()
    }

    /// Tie-break ranks as display characters, e.g. `['A', 'K']`.
    pub fn tiebreaker_chars(&self) -> Vec<char> {
        self.made
            .tiebreakers()
            .into_iter()
            .map(|r| RANK_CHARS[r as usize])
            .collect()
    }
}

/// Hand evaluator for poker hands.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    /// Create a new hand evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate 5-7 distinct cards, rejecting anything else.
    pub fn evaluate(&self, cards: &[Card]) -> Result<HandValue> {
        if cards.len() < 5 || cards.len() > 7 {
            return Err(EngineError::hand(
                "cards",
                format!("need 5 to 7 cards, received {}", cards.len()),
            ));
        }
        if let Err(card) = CardSet::from_unique(cards) {
            return Err(EngineError::hand("cards", format!("duplicate card {}", card)));
        }

        let made = self.made_hand(cards);
        let rank = made.rank();
        Ok(HandValue {
            rank,
            made,
            percentile: self.percentile(rank, cards.len()),
            card_count: cards.len(),
        })
    }

    /// Rank 5-7 cards without validation. Hot path for equity calculation.
    #[inline]
    pub fn rank(&self, cards: &[Card]) -> HandRank {
        self.made_hand(cards).rank()
    }

    /// Compare two hands. Positive means `a` wins.
    pub fn compare(&self, a: &[Card], b: &[Card]) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// Classify the best five-card hand contained in `cards`.
    pub fn made_hand(&self, cards: &[Card]) -> MadeHand {
        debug_assert!(cards.len() >= 5 && cards.len() <= 7);

        let mut suit_bits = [0u16; 4];
        let mut counts = [0u8; 13];
        let mut rank_bits = 0u16;

        for card in cards {
            suit_bits[card.suit() as usize] |= 1 << card.rank();
            counts[card.rank() as usize] += 1;
            rank_bits |= 1 << card.rank();
        }

        // At most one suit can hold five of seven cards
        let flush_bits = suit_bits.iter().copied().find(|b| b.count_ones() >= 5);

        if let Some(bits) = flush_bits {
            if let Some(high) = find_straight(bits) {
                return MadeHand::StraightFlush { high };
            }
        }

        // Group ranks, highest first
        let mut quads: Option<u8> = None;
        let mut trips = [0u8; 2];
        let mut num_trips = 0;
        let mut pairs = [0u8; 3];
        let mut num_pairs = 0;

        for rank in (0..13u8).rev() {
            match counts[rank as usize] {
                4 => quads = quads.or(Some(rank)),
                3 if num_trips < 2 => {
                    trips[num_trips] = rank;
                    num_trips += 1;
                }
                2 if num_pairs < 3 => {
                    pairs[num_pairs] = rank;
                    num_pairs += 1;
                }
                _ => {}
            }
        }

        if let Some(quads) = quads {
            let [kicker] = top_ranks::<1>(rank_bits & !(1 << quads));
            return MadeHand::FourOfAKind { quads, kicker };
        }

        if num_trips > 0 && (num_trips > 1 || num_pairs > 0) {
            let pair = match (num_trips > 1, num_pairs > 0) {
                (true, true) => trips[1].max(pairs[0]),
                (true, false) => trips[1],
                _ => pairs[0],
            };
            return MadeHand::FullHouse {
                trips: trips[0],
                pair,
            };
        }

        if let Some(bits) = flush_bits {
            return MadeHand::Flush(top_ranks::<5>(bits));
        }

        if let Some(high) = find_straight(rank_bits) {
            return MadeHand::Straight { high };
        }

        if num_trips == 1 {
            return MadeHand::ThreeOfAKind {
                trips: trips[0],
                kickers: top_ranks::<2>(rank_bits & !(1 << trips[0])),
            };
        }

        if num_pairs >= 2 {
            let [kicker] = top_ranks::<1>(rank_bits & !(1 << pairs[0]) & !(1 << pairs[1]));
            return MadeHand::TwoPair {
                high: pairs[0],
                low: pairs[1],
                kicker,
            };
        }

        if num_pairs == 1 {
            return MadeHand::OnePair {
                pair: pairs[0],
                kickers: top_ranks::<3>(rank_bits & !(1 << pairs[0])),
            };
        }

        MadeHand::HighCard(top_ranks::<5>(rank_bits))
    }

    /// Percentile of `rank` among all hands of `card_count` cards.
    ///
    /// Exact at category boundaries, linearly interpolated on the tie-break
    /// key between the weakest and strongest five-card hand of the category.
    pub fn percentile(&self, rank: HandRank, card_count: usize) -> f64 {
        let table = match card_count {
            5 => &FIVE_CARD_COUNTS,
            6 => &SIX_CARD_COUNTS,
            _ => &SEVEN_CARD_COUNTS,
        };
        let category = rank.category() as usize;
        let total: u64 = table.iter().sum();
        let below: u64 = table[..category].iter().sum();
        let (low, high) = key_bounds(rank.category());
        let within = (rank.key().saturating_sub(low) as f64 / (high - low) as f64).min(1.0);

        ((below as f64 + within * table[category] as f64) / total as f64).clamp(0.0, 1.0)
    }
}

/// Tie-break keys of the weakest and strongest hand in a category.
fn key_bounds(category: HandCategory) -> (u32, u32) {
    let (weakest, strongest) = match category {
        HandCategory::HighCard => (MadeHand::HighCard([5, 3, 2, 1, 0]), MadeHand::HighCard([12, 11, 10, 9, 7])),
        HandCategory::OnePair => (
            MadeHand::OnePair { pair: 0, kickers: [3, 2, 1] },
            MadeHand::OnePair { pair: 12, kickers: [11, 10, 9] },
        ),
        HandCategory::TwoPair => (
            MadeHand::TwoPair { high: 1, low: 0, kicker: 2 },
            MadeHand::TwoPair { high: 12, low: 11, kicker: 10 },
        ),
        HandCategory::ThreeOfAKind => (
            MadeHand::ThreeOfAKind { trips: 0, kickers: [2, 1] },
            MadeHand::ThreeOfAKind { trips: 12, kickers: [11, 10] },
        ),
        HandCategory::Straight => (MadeHand::Straight { high: RANK_5 }, MadeHand::Straight { high: 12 }),
        HandCategory::Flush => (MadeHand::Flush([5, 3, 2, 1, 0]), MadeHand::Flush([12, 11, 10, 9, 7])),
        HandCategory::FullHouse => (
            MadeHand::FullHouse { trips: 0, pair: 1 },
            MadeHand::FullHouse { trips: 12, pair: 11 },
        ),
        HandCategory::FourOfAKind => (
            MadeHand::FourOfAKind { quads: 0, kicker: 1 },
            MadeHand::FourOfAKind { quads: 12, kicker: 11 },
        ),
        HandCategory::StraightFlush => (
            MadeHand::StraightFlush { high: RANK_5 },
            MadeHand::StraightFlush { high: 12 },
        ),
    };
    (weakest.rank().key(), strongest.rank().key())
}

/// Find the highest straight from a rank bitmask.
/// Returns the high card of the straight, or None if no straight.
#[inline]
fn find_straight(rank_bits: u16) -> Option<u8> {
    for high in (4..13u8).rev() {
        let mask = 0b11111u16 << (high - 4);
        if rank_bits & mask == mask {
            return Some(high);
        }
    }

    // Wheel: A-2-3-4-5 = bits 12,0,1,2,3
    const WHEEL: u16 = 0b1_0000_0000_1111;
    if rank_bits & WHEEL == WHEEL {
        return Some(RANK_5);
    }

    None
}

/// The `N` highest ranks set in `bits`, highest first.
#[inline]
fn top_ranks<const N: usize>(bits: u16) -> [u8; N] {
    let mut out = [0u8; N];
    let mut n = 0;
    let mut rank = 13u8;
    while n < N && rank > 0 {
        rank -= 1;
        if bits & (1 << rank) != 0 {
            out[n] = rank;
            n += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::parse_cards;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn cards(s: &str) -> Vec<Card> {
        parse_cards(s).unwrap()
    }

    fn category(s: &str) -> HandCategory {
        HandEvaluator::new().evaluate(&cards(s)).unwrap().category()
    }

    fn rank(s: &str) -> HandRank {
        HandEvaluator::new().rank(&cards(s))
    }

    /// Best of all five-card subsets, for cross-checking 6-7 card hands.
    fn brute_force_best(hand: &[Card]) -> HandRank {
        let eval = HandEvaluator::new();
        let n = hand.len();
        let mut best = HandRank::default();
        for a in 0..n {
            for b in (a + 1)..n {
                for c in (b + 1)..n {
                    for d in (c + 1)..n {
                        for e in (d + 1)..n {
                            let five = [hand[a], hand[b], hand[c], hand[d], hand[e]];
                            best = best.max(eval.rank(&five));
                        }
                    }
                }
            }
        }
        best
    }

    fn random_hand(rng: &mut StdRng, n: usize) -> Vec<Card> {
        let mut deck: Vec<Card> = (0..52u8).map(Card::from_id).collect();
        deck.shuffle(rng);
        deck.truncate(n);
        deck
    }

    #[test]
    fn test_categories() {
        assert_eq!(category("As Kd Qh Jc 9s"), HandCategory::HighCard);
        assert_eq!(category("As Ad Kh Qc Js"), HandCategory::OnePair);
        assert_eq!(category("As Ad Kh Kc Js"), HandCategory::TwoPair);
        assert_eq!(category("As Ad Ah Kc Js"), HandCategory::ThreeOfAKind);
        assert_eq!(category("Ts 9d 8h 7c 6s"), HandCategory::Straight);
        assert_eq!(category("As Ks 9s 7s 2s"), HandCategory::Flush);
        assert_eq!(category("As Ad Ah Kc Kd"), HandCategory::FullHouse);
        assert_eq!(category("As Ad Ah Ac Ks"), HandCategory::FourOfAKind);
        assert_eq!(category("9s 8s 7s 6s 5s"), HandCategory::StraightFlush);
        assert_eq!(category("As Ks Qs Js Ts"), HandCategory::StraightFlush);
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = rank("5s 4d 3h 2c As");
        let six_high = rank("6s 5d 4h 3c 2s");
        assert_eq!(wheel.category(), HandCategory::Straight);
        assert!(wheel < six_high);

        let steel_wheel = rank("5s 4s 3s 2s As");
        assert_eq!(steel_wheel.category(), HandCategory::StraightFlush);
        assert!(steel_wheel < rank("6s 5s 4s 3s 2s"));
    }

    #[test]
    fn test_kicker_ordering() {
        // Trip rank before kickers
        assert!(rank("Ks Kd Kh 2c 3s") > rank("Qs Qd Qh Ac Ks"));
        // Same pair, kicker decides
        assert!(rank("As Ad Kh 7c 3s") > rank("Ah Ac Qh Jc 9s"));
        // Two pair: top pair, then low pair, then kicker
        assert!(rank("As Ad 3h 3c 2s") > rank("Ks Kd Qh Qc As"));
        assert!(rank("As Ad 3h 3c Ks") > rank("Ah Ac 3d 3s Qs"));
        // Full house: trips first
        assert!(rank("3s 3d 3h 2c 2s") > rank("2h 2d 2s Ac Ad"));
        // Identical strength in different suits ties
        assert_eq!(rank("As Kd Qh Jc 9s"), rank("Ah Kc Qd Js 9h"));
    }

    #[test]
    fn test_seven_card_selects_best_five() {
        let eval = HandEvaluator::new();

        let hand = cards("Ah As Ad Ac Kh Qs Jd");
        assert_eq!(eval.made_hand(&hand), MadeHand::FourOfAKind { quads: 12, kicker: 11 });

        // Two trips make a full house using the lower trips as the pair
        let hand = cards("Kh Ks Kd 9c 9h 9s 2d");
        assert_eq!(eval.made_hand(&hand), MadeHand::FullHouse { trips: 11, pair: 7 });

        // Three pairs: third pair can play as kicker
        let hand = cards("Kh Ks 9d 9c 4h 4s Td");
        assert_eq!(eval.made_hand(&hand), MadeHand::TwoPair { high: 11, low: 7, kicker: 8 });

        // Flush beats the straight also present
        let hand = cards("9h 8h 7h 6c 5h 2h Ts");
        assert_eq!(eval.made_hand(&hand).category(), HandCategory::Flush);
    }

    #[test]
    fn test_matches_brute_force_on_random_hands() {
        let eval = HandEvaluator::new();
        let mut rng = StdRng::seed_from_u64(2024);
        for n in [6, 7] {
            for _ in 0..3_000 {
                let hand = random_hand(&mut rng, n);
                assert_eq!(eval.rank(&hand), brute_force_best(&hand), "hand {:?}", hand);
            }
        }
    }

    #[test]
    fn test_strength_order_follows_category_order() {
        let eval = HandEvaluator::new();
        let mut rng = StdRng::seed_from_u64(99);
        let ranks: Vec<HandRank> = (0..2_000)
            .map(|_| eval.rank(&random_hand(&mut rng, 7)))
            .collect();
        for pair in ranks.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.category() > b.category() {
                assert!(a > b);
            } else if a.category() < b.category() {
                assert!(a < b);
            }
        }
    }

    #[test]
    fn test_permutation_invariance() {
        let eval = HandEvaluator::new();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let mut hand = random_hand(&mut rng, 7);
            let expected = eval.rank(&hand);
            hand.shuffle(&mut rng);
            assert_eq!(eval.rank(&hand), expected);
            hand.reverse();
            assert_eq!(eval.rank(&hand), expected);
        }
    }

    #[test]
    fn test_five_card_category_counts_are_exact() {
        let eval = HandEvaluator::new();
        let deck: Vec<Card> = (0..52u8).map(Card::from_id).collect();
        let mut counts = [0u64; 9];
        for a in 0..52 {
            for b in (a + 1)..52 {
                for c in (b + 1)..52 {
                    for d in (c + 1)..52 {
                        for e in (d + 1)..52 {
                            let five = [deck[a], deck[b], deck[c], deck[d], deck[e]];
                            counts[eval.rank(&five).category() as usize] += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(counts, FIVE_CARD_COUNTS);
    }

    #[test]
    fn test_frequency_tables_totals() {
        assert_eq!(FIVE_CARD_COUNTS.iter().sum::<u64>(), 2_598_960);
        assert_eq!(SIX_CARD_COUNTS.iter().sum::<u64>(), 20_358_520);
        assert_eq!(SEVEN_CARD_COUNTS.iter().sum::<u64>(), 133_784_560);
    }

    #[test]
    fn test_percentile_monotonic() {
        let eval = HandEvaluator::new();
        let hands = [
            "7s 5d 4h 3c 2s",
            "As Ad Kh Qc Js",
            "As Ad Kh Kc Js",
            "Ts 9d 8h 7c 6s",
            "As Ks 9s 7s 2s",
            "As Ad Ah Kc Kd",
            "As Ks Qs Js Ts",
        ];
        let percentiles: Vec<f64> = hands
            .iter()
            .map(|h| eval.evaluate(&cards(h)).unwrap().percentile)
            .collect();
        for pair in percentiles.windows(2) {
            assert!(pair[0] < pair[1], "{:?}", percentiles);
        }
        assert!(percentiles.iter().all(|p| (0.0..=1.0).contains(p)));
        // A straight beats more than 99% of five-card hands
        assert!(percentiles[3] > 0.99);
    }

    #[test]
    fn test_percentile_spans_category() {
        let eval = HandEvaluator::new();
        let percentile = |h: &str| eval.evaluate(&cards(h)).unwrap().percentile;

        assert!(percentile("7c 5d 4h 3s 2c") < 0.01);
        let best_high_card = percentile("Ac Kd Qh Js 9c");
        assert!(best_high_card > 0.49 && best_high_card <= 0.5012, "{}", best_high_card);

        let worst_pair = percentile("2c 2d 5h 4s 3c");
        assert!(worst_pair >= best_high_card);
        assert!(worst_pair < 0.502, "{}", worst_pair);

        assert!((percentile("As Ks Qs Js Ts") - 1.0).abs() < 1e-12);
        assert!(percentile("5s 4s 3s 2s As") < 1.0);
    }

    #[test]
    fn test_invalid_hands() {
        let eval = HandEvaluator::new();
        assert!(matches!(
            eval.evaluate(&cards("As Kd Qh Jc")),
            Err(EngineError::InvalidHand { .. })
        ));
        assert!(matches!(
            eval.evaluate(&cards("As Kd Qh Jc 9s 8s 7s 6s")),
            Err(EngineError::InvalidHand { .. })
        ));
        assert!(matches!(
            eval.evaluate(&cards("As As Qh Jc 9s")),
            Err(EngineError::InvalidHand { .. })
        ));
    }

    #[test]
    fn test_tiebreaker_chars() {
        let value = HandEvaluator::new().evaluate(&cards("Ks Kd Kh 2c 3s")).unwrap();
        assert_eq!(value.tiebreaker_chars(), vec!['K', '3', '2']);
    }
}
