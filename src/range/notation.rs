//! Range notation parsing.
//!
//! Turns compact notation into an explicit list of weighted combinations.
//! Supports: "AA", "AKs", "AKo", "AK" (both suited and offsuit), "TT+",
//! "AQs+", "A5s-A2s", "77-99", explicit combos like "AsKh", the wildcard
//! "random" / "*", and an optional weight suffix such as "AKs:0.5".
//!
//! Parsing knows nothing about dead cards or sampling; see [`super::WeightedRange`].

use thiserror::Error;

use crate::cards::card::{parse_rank, Card, HoleCards};

/// Error type for range parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeParseError {
    #[error("Invalid hand format: {0}")]
    InvalidFormat(String),
    #[error("Invalid rank character: {0}")]
    InvalidRank(char),
    #[error("Invalid suffix: {0} (expected 's' or 'o')")]
    InvalidSuffix(char),
    #[error("Invalid range notation: {0}")]
    InvalidRange(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
}

/// A starting-hand class such as AKs, AKo or QQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HandClass {
    high: u8,
    low: u8,
    suited: bool,
}

impl HandClass {
    fn pair(rank: u8) -> Self {
        Self {
            high: rank,
            low: rank,
            suited: false,
        }
    }

    /// All specific combos of this class.
    fn combos(&self) -> Vec<HoleCards> {
        let mut out = Vec::with_capacity(12);
        if self.high == self.low {
            for s1 in 0..4u8 {
                for s2 in (s1 + 1)..4 {
                    out.push(HoleCards::new(Card::new(self.high, s1), Card::new(self.low, s2)));
                }
            }
        } else if self.suited {
            for s in 0..4u8 {
                out.push(HoleCards::new(Card::new(self.high, s), Card::new(self.low, s)));
            }
        } else {
            for s1 in 0..4u8 {
                for s2 in 0..4u8 {
                    if s1 != s2 {
                        out.push(HoleCards::new(Card::new(self.high, s1), Card::new(self.low, s2)));
                    }
                }
            }
        }
        out
    }
}

/// Which suitedness a non-pair token asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suitedness {
    Suited,
    Offsuit,
    Both,
}

impl Suitedness {
    fn classes(self, high: u8, low: u8) -> Vec<HandClass> {
        let suited = HandClass { high, low, suited: true };
        let offsuit = HandClass { high, low, suited: false };
        match self {
            Suitedness::Suited => vec![suited],
            Suitedness::Offsuit => vec![offsuit],
            Suitedness::Both => vec![suited, offsuit],
        }
    }
}

/// Parse a notation string into weighted combinations.
///
/// Combos may repeat across tokens; de-duplication is the caller's concern.
pub fn parse(notation: &str) -> Result<Vec<(HoleCards, f64)>, RangeParseError> {
    let mut out = Vec::new();

    for part in notation.split(',').map(|s| s.trim()) {
        if part.is_empty() {
            continue;
        }

        let (hand, weight) = match part.split_once(':') {
            Some((hand, w)) => (hand.trim(), parse_weight(w.trim())?),
            None => (part, 1.0),
        };

        for combo in parse_part(hand)? {
            out.push((combo, weight));
        }
    }

    Ok(out)
}

/// Every one of the 1326 two-card combinations.
pub fn all_combos() -> Vec<HoleCards> {
    let mut out = Vec::with_capacity(1326);
    for a in 0..52u8 {
        for b in (a + 1)..52 {
            out.push(HoleCards::new(Card::from_id(a), Card::from_id(b)));
        }
    }
    out
}

fn parse_weight(s: &str) -> Result<f64, RangeParseError> {
    match s.parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(RangeParseError::InvalidWeight(s.to_string())),
    }
}

/// Parse a single part of range notation.
fn parse_part(part: &str) -> Result<Vec<HoleCards>, RangeParseError> {
    if part.eq_ignore_ascii_case("random") || part == "*" || part.eq_ignore_ascii_case("any") {
        return Ok(all_combos());
    }

    // Explicit combo (e.g., "AsKh")
    if part.len() == 4 {
        if let Some(hole) = HoleCards::parse(part) {
            return Ok(vec![hole]);
        }
    }

    let classes = if let Some((start, end)) = part.split_once('-') {
        parse_range_notation(start.trim(), end.trim())?
    } else if let Some(hand) = part.strip_suffix('+') {
        parse_plus_notation(hand)?
    } else {
        parse_single_hand(part)?
    };

    Ok(classes.iter().flat_map(HandClass::combos).collect())
}

/// Split a token into its two ranks and suitedness.
fn parse_token(hand: &str) -> Result<(u8, u8, Suitedness), RangeParseError> {
    let chars: Vec<char> = hand.chars().collect();

    if chars.len() < 2 || chars.len() > 3 {
        return Err(RangeParseError::InvalidFormat(hand.to_string()));
    }

    let r1 = parse_rank(chars[0]).ok_or(RangeParseError::InvalidRank(chars[0]))?;
    let r2 = parse_rank(chars[1]).ok_or(RangeParseError::InvalidRank(chars[1]))?;

    let suitedness = match chars.get(2) {
        None => Suitedness::Both,
        Some('s' | 'S') => Suitedness::Suited,
        Some('o' | 'O') => Suitedness::Offsuit,
        Some(&c) => return Err(RangeParseError::InvalidSuffix(c)),
    };

    if r1 == r2 && suitedness != Suitedness::Both {
        return Err(RangeParseError::InvalidFormat(hand.to_string()));
    }

    Ok((r1.max(r2), r1.min(r2), suitedness))
}

/// Parse a single hand notation like "AA", "AKs", "AKo", "AK".
fn parse_single_hand(hand: &str) -> Result<Vec<HandClass>, RangeParseError> {
    let (high, low, suitedness) = parse_token(hand)?;

    if high == low {
        return Ok(vec![HandClass::pair(high)]);
    }
    Ok(suitedness.classes(high, low))
}

/// Parse plus notation like "TT+" or "AQs+".
fn parse_plus_notation(hand: &str) -> Result<Vec<HandClass>, RangeParseError> {
    let (high, low, suitedness) = parse_token(hand)?;

    if high == low {
        // Pairs: TT+ means TT, JJ, QQ, KK, AA
        return Ok((high..13).map(HandClass::pair).collect());
    }

    // Non-pairs: AQs+ means AQs, AKs
    Ok((low..high)
        .flat_map(|kicker| suitedness.classes(high, kicker))
        .collect())
}

/// Parse range notation like "A5s-A2s" or "77-99".
fn parse_range_notation(start: &str, end: &str) -> Result<Vec<HandClass>, RangeParseError> {
    let (s_high, s_low, s_suit) = parse_token(start)?;
    let (e_high, e_low, e_suit) = parse_token(end)?;
    let invalid = || RangeParseError::InvalidRange(format!("{}-{}", start, end));

    let start_pair = s_high == s_low;
    let end_pair = e_high == e_low;

    if start_pair && end_pair {
        let (lo, hi) = (s_high.min(e_high), s_high.max(e_high));
        return Ok((lo..=hi).map(HandClass::pair).collect());
    }

    // Must share the high card and the suitedness
    if start_pair || end_pair || s_high != e_high || s_suit != e_suit {
        return Err(invalid());
    }

    let (lo, hi) = (s_low.min(e_low), s_low.max(e_low));
    Ok((lo..=hi)
        .flat_map(|kicker| s_suit.classes(s_high, kicker))
        .collect())
}
