//! # Move Notation
//!
//! Parsing, validation, formatting and inversion of face-turn tokens.
//!
//! ```text
//! token    := face modifier
//! face     := "U" | "D" | "F" | "B" | "L" | "R"
//! modifier := ""      clockwise quarter turn
//!           | "'"     counter-clockwise quarter turn
//!           | "2"     half turn
//! sequence := token (whitespace token)*
//! ```
//!
//! Everything here is pure. Malformed input never panics: single tokens
//! fail validation, and sequence parsing skips the bad tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Face;
use crate::error::CubeError;

/// Display glyph for a counter-clockwise turn (U+2032 PRIME).
pub const PRIME_GLYPH: char = '\u{2032}';
/// Display glyph for a half turn (U+00B2 SUPERSCRIPT TWO).
pub const HALF_TURN_GLYPH: char = '\u{00B2}';

/// How far a face turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    /// 90° clockwise, no suffix.
    Clockwise,
    /// 180°, suffix `2`.
    Half,
    /// 90° counter-clockwise, suffix `'`.
    CounterClockwise,
}

impl Turn {
    /// All turn amounts.
    pub const ALL: [Turn; 3] = [Turn::Clockwise, Turn::CounterClockwise, Turn::Half];

    /// Clockwise quarter turns modulo 4 (1, 2 or 3).
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::Clockwise => 1,
            Self::Half => 2,
            Self::CounterClockwise => 3,
        }
    }

    /// Signed quarter turns: clockwise 1, half 2, counter-clockwise -1.
    #[must_use]
    pub const fn signed_quarter_turns(self) -> i32 {
        match self {
            Self::Clockwise => 1,
            Self::Half => 2,
            Self::CounterClockwise => -1,
        }
    }

    /// Build from a clockwise quarter-turn count. `None` for multiples of 4.
    #[must_use]
    pub const fn from_quarter_turns(count: i32) -> Option<Self> {
        match count.rem_euclid(4) {
            1 => Some(Self::Clockwise),
            2 => Some(Self::Half),
            3 => Some(Self::CounterClockwise),
            _ => None,
        }
    }

    /// The turn that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::Half => Self::Half,
        }
    }

    /// Notation suffix.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Clockwise => "",
            Self::Half => "2",
            Self::CounterClockwise => "'",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Self::Clockwise),
            "2" => Some(Self::Half),
            "'" => Some(Self::CounterClockwise),
            _ => None,
        }
    }
}

/// A single face turn. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move {
    /// Face being turned.
    pub face: Face,
    /// Turn amount.
    pub turn: Turn,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    /// Parse a single token, `None` if it fails [`validate`].
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let face = Face::from_letter(chars.next()?)?;
        let turn = Turn::from_suffix(chars.as_str())?;
        Some(Self { face, turn })
    }

    /// The move that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self {
            face: self.face,
            turn: self.turn.inverse(),
        }
    }

    /// Notation token, e.g. `R'` or `U2`.
    #[must_use]
    pub fn token(self) -> String {
        self.to_string()
    }

    /// Display form using typographic glyphs, e.g. `R′` or `U²`.
    #[must_use]
    pub fn pretty(self) -> String {
        match self.turn {
            Turn::Clockwise => self.face.letter().to_string(),
            Turn::CounterClockwise => format!("{}{PRIME_GLYPH}", self.face.letter()),
            Turn::Half => format!("{}{HALF_TURN_GLYPH}", self.face.letter()),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CubeError::InvalidMoveToken(s.to_string()))
    }
}

impl TryFrom<String> for Move {
    type Error = CubeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.token()
    }
}

/// Whether `token` is a well-formed move: one face letter followed by
/// nothing, `'` or `2`.
#[must_use]
pub fn validate(token: &str) -> bool {
    Move::parse(token).is_some()
}

/// Split on whitespace and keep the valid tokens, in order.
#[must_use]
pub fn parse_sequence(text: &str) -> Vec<Move> {
    parse_sequence_lenient(text).0
}

/// Like [`parse_sequence`], also returning the tokens that were skipped.
#[must_use]
pub fn parse_sequence_lenient(text: &str) -> (Vec<Move>, Vec<&str>) {
    let mut moves = Vec::new();
    let mut rejected = Vec::new();
    for token in text.split_whitespace() {
        if let Some(mv) = Move::parse(token) {
            moves.push(mv);
        } else {
            tracing::warn!("Skipping malformed move token {token:?}");
            rejected.push(token);
        }
    }
    (moves, rejected)
}

/// Display string for one move (see [`Move::pretty`]).
#[must_use]
pub fn format(mv: Move) -> String {
    mv.pretty()
}

/// Space-separated display string for a sequence.
#[must_use]
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|mv| mv.pretty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-separated notation tokens, parseable by [`parse_sequence`].
#[must_use]
pub fn to_notation(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|mv| mv.token())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inverse of a single move.
#[must_use]
pub const fn invert(mv: Move) -> Move {
    mv.inverse()
}

/// Group inverse of a word: reversed, each move inverted.
#[must_use]
pub fn invert_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}
