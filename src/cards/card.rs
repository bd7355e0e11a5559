//! Card representation.
//!
//! This module provides the value types everything else is built on:
//! - `Card`: A single playing card with rank and suit
//! - `CardSet`: A 64-bit mask of cards for dead-card and collision checks
//! - `HoleCards`: A player's two private cards
//! - `Board`: Community cards (0, 3, 4 or 5 cards)
//! - `Street`: Betting round implied by the board
//! - `Deck`: The live cards left once known cards are removed

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// Rank of a card (0-12: 2-A).
pub const RANK_2: u8 = 0;
pub const RANK_3: u8 = 1;
pub const RANK_4: u8 = 2;
pub const RANK_5: u8 = 3;
pub const RANK_6: u8 = 4;
pub const RANK_7: u8 = 5;
pub const RANK_8: u8 = 6;
pub const RANK_9: u8 = 7;
pub const RANK_T: u8 = 8;
pub const RANK_J: u8 = 9;
pub const RANK_Q: u8 = 10;
pub const RANK_K: u8 = 11;
pub const RANK_A: u8 = 12;

/// Suit of a card (0-3).
pub const SUIT_CLUBS: u8 = 0;
pub const SUIT_DIAMONDS: u8 = 1;
pub const SUIT_HEARTS: u8 = 2;
pub const SUIT_SPADES: u8 = 3;

/// Rank characters for display.
pub(crate) const RANK_CHARS: [char; 13] =
    ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit characters for display.
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// Parse a rank character (case-insensitive).
pub(crate) fn parse_rank(c: char) -> Option<u8> {
    RANK_CHARS
        .iter()
        .position(|&r| r == c.to_ascii_uppercase())
        .map(|r| r as u8)
}

/// A single playing card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    /// Card index 0-51: rank * 4 + suit
    id: u8,
}

impl Card {
    /// Create a new card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank must be 0-12");
        debug_assert!(suit < 4, "suit must be 0-3");
        Self { id: rank * 4 + suit }
    }

    /// Create a card from its ID (0-51).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52, "card id must be 0-51");
        Self { id }
    }

    /// Parse a card from string like "As", "Kh", "2c".
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let (r, s, rest) = (chars.next()?, chars.next()?, chars.next());
        if rest.is_some() {
            return None;
        }

        let rank = parse_rank(r)?;
        let suit = SUIT_CHARS.iter().position(|&c| c == s.to_ascii_lowercase())?;

        Some(Self::new(rank, suit as u8))
    }

    /// Get the card's ID (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Get the card's rank (0-12: 2-A).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4
    }

    /// Get the card's suit (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    /// Single-bit mask for this card.
    #[inline]
    pub fn mask(&self) -> u64 {
        1u64 << self.id
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[self.rank() as usize]
    }

    /// Get suit character for display.
    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }
}

impl FromStr for Card {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Card::parse(s).ok_or_else(|| EngineError::hand("card", format!("unrecognised card '{}'", s)))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Card {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Card::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid card '{}'", s)))
    }
}

/// A set of cards as a 64-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardSet(u64);

impl CardSet {
    /// The empty set.
    pub const EMPTY: CardSet = CardSet(0);

    /// Build a set from cards, failing on the first duplicate.
    pub fn from_unique(cards: &[Card]) -> std::result::Result<Self, Card> {
        let mut set = Self::EMPTY;
        for &card in cards {
            if set.contains(card) {
                return Err(card);
            }
            set.insert(card);
        }
        Ok(set)
    }

    /// Raw mask.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Add a card.
    #[inline]
    pub fn insert(&mut self, card: Card) {
        self.0 |= card.mask();
    }

    /// Check membership.
    #[inline]
    pub fn contains(&self, card: Card) -> bool {
        self.0 & card.mask() != 0
    }

    /// True if the sets share any card.
    #[inline]
    pub fn intersects(&self, other: CardSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two sets.
    #[inline]
    pub fn union(&self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    /// Number of cards in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no cards are in the set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardSet(")?;
        for id in 0..52u8 {
            if self.0 & (1u64 << id) != 0 {
                write!(f, "{}", Card::from_id(id))?;
            }
        }
        write!(f, ")")
    }
}

/// A player's two hole cards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HoleCards {
    /// First card (higher rank by convention).
    pub card1: Card,
    /// Second card.
    pub card2: Card,
}

impl HoleCards {
    /// Create hole cards, ordering by rank (higher first, then by id).
    pub fn new(card1: Card, card2: Card) -> Self {
        debug_assert!(card1 != card2, "hole cards must be distinct");
        if (card1.rank(), card1.id()) >= (card2.rank(), card2.id()) {
            Self { card1, card2 }
        } else {
            Self {
                card1: card2,
                card2: card1,
            }
        }
    }

    /// Create hole cards, rejecting a repeated card.
    pub fn try_new(card1: Card, card2: Card) -> Result<Self> {
        if card1 == card2 {
            return Err(EngineError::hand("hero", format!("duplicate card {}", card1)));
        }
        Ok(Self::new(card1, card2))
    }

    /// Parse hole cards from string like "AhKs" or "Ah Ks".
    pub fn parse(s: &str) -> Option<Self> {
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        let c1 = Card::parse(&s[0..2])?;
        let c2 = Card::parse(&s[2..4])?;
        if c1 == c2 {
            return None;
        }
        Some(Self::new(c1, c2))
    }

    /// Check if hole cards are suited.
    pub fn is_suited(&self) -> bool {
        self.card1.suit() == self.card2.suit()
    }

    /// Check if hole cards are a pair.
    pub fn is_pair(&self) -> bool {
        self.card1.rank() == self.card2.rank()
    }

    /// Get both cards as an array.
    pub fn cards(&self) -> [Card; 2] {
        [self.card1, self.card2]
    }

    /// Both cards as a mask.
    #[inline]
    pub fn mask(&self) -> CardSet {
        CardSet(self.card1.mask() | self.card2.mask())
    }

    /// Check if a card conflicts with these hole cards.
    pub fn contains(&self, card: Card) -> bool {
        self.card1 == card || self.card2 == card
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.card1, self.card2)
    }
}

impl fmt::Debug for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for HoleCards {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HoleCards {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HoleCards::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid hole cards '{}'", s)))
    }
}

/// Community cards on the board.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(5),
        }
    }

    /// Create a board from cards, validating size and uniqueness.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        if cards.len() > 5 {
            return Err(EngineError::board("board", format!(
                "board has {} cards, at most 5 allowed",
                cards.len()
            )));
        }
        if matches!(cards.len(), 1 | 2) {
            return Err(EngineError::board("board", format!(
                "board has {} cards, expected 0, 3, 4 or 5",
                cards.len()
            )));
        }
        if let Err(card) = CardSet::from_unique(&cards) {
            return Err(EngineError::board("board", format!("duplicate card {}", card)));
        }
        Ok(Self { cards })
    }

    /// Parse a board from string like "AhKsQd".
    pub fn parse(s: &str) -> Result<Self> {
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if s.len() % 2 != 0 || !s.is_ascii() {
            return Err(EngineError::board("board", format!("malformed board '{}'", s)));
        }

        let mut cards = Vec::with_capacity(5);
        for i in (0..s.len()).step_by(2) {
            let card = Card::parse(&s[i..i + 2])
                .ok_or_else(|| EngineError::board("board", format!("unrecognised card '{}'", &s[i..i + 2])))?;
            cards.push(card);
        }
        Self::from_cards(cards)
    }

    /// Get the number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if board is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get the cards on the board.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Board cards as a mask.
    pub fn mask(&self) -> CardSet {
        let mut set = CardSet::EMPTY;
        for &card in &self.cards {
            set.insert(card);
        }
        set
    }

    /// Check if the board contains a specific card.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Number of cards still to come before showdown.
    pub fn cards_to_come(&self) -> usize {
        5 - self.cards.len()
    }

    /// Get the current street based on board cards.
    pub fn street(&self) -> Street {
        match self.cards.len() {
            0 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

/// Street in a poker hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Get the next street.
    pub fn next(&self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Get street index (0-3).
    pub fn index(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 1,
            Street::Turn => 2,
            Street::River => 3,
        }
    }

    /// Number of board cards for this street.
    pub fn num_board_cards(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    /// Check that a board matches this street.
    pub fn check_board(&self, board: &Board) -> Result<()> {
        if board.len() != self.num_board_cards() {
            return Err(EngineError::board("street", format!(
                "{} requires exactly {} community cards, received {}",
                self,
                self.num_board_cards(),
                board.len()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "Preflop"),
            Street::Flop => write!(f, "Flop"),
            Street::Turn => write!(f, "Turn"),
            Street::River => write!(f, "River"),
        }
    }
}

/// The live cards of a deck once known cards are removed.
#[derive(Clone)]
pub struct Deck {
    /// Live cards; only the first `size` entries are valid.
    cards: [Card; 52],
    /// Number of live cards.
    size: usize,
}

impl Deck {
    /// Create a full 52-card deck in standard order.
    pub fn new() -> Self {
        Self::without(CardSet::EMPTY)
    }

    /// Create a deck with the given cards removed.
    pub fn without(dead: CardSet) -> Self {
        let mut cards = [Card::from_id(0); 52];
        let mut size = 0;
        for id in 0..52u8 {
            let card = Card::from_id(id);
            if !dead.contains(card) {
                cards[size] = card;
                size += 1;
            }
        }
        Self { cards, size }
    }

    /// Number of live cards.
    pub fn remaining(&self) -> usize {
        self.size
    }

    /// Live cards as a slice.
    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards[..self.size]
    }

    /// Deal `out.len()` distinct random cards avoiding `blocked`.
    ///
    /// Works on a stack copy of the live cards with a partial Fisher-Yates
    /// shuffle, so it does not allocate. Returns false if too few cards remain.
    pub fn deal_into<R: Rng>(&self, blocked: CardSet, out: &mut [Card], rng: &mut R) -> bool {
        let mut pool = [Card::from_id(0); 52];
        let mut n = 0;
        for &card in self.remaining_cards() {
            if !blocked.contains(card) {
                pool[n] = card;
                n += 1;
            }
        }
        if n < out.len() {
            return false;
        }
        for (i, slot) in out.iter_mut().enumerate() {
            let j = rng.gen_range(i..n);
            pool.swap(i, j);
            *slot = pool[i];
        }
        true
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} remaining)", self.remaining())
    }
}

/// Parse whitespace-free card lists like "AsKhQd" into cards.
pub fn parse_cards(s: &str) -> Option<Vec<Card>> {
    let s: String = s.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len()).step_by(2).map(|i| Card::parse(&s[i..i + 2])).collect()
}
