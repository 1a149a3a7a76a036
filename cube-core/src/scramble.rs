//! Random scramble generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::color::Face;
use crate::notation::{Move, Turn};

/// Default number of moves in a scramble.
pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

/// Configuration for scramble generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrambleConfig {
    /// Number of moves.
    pub length: usize,
    /// Fixed seed for reproducible scrambles; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_SCRAMBLE_LENGTH,
            seed: None,
        }
    }
}

impl ScrambleConfig {
    /// Config with the given length and no seed.
    #[must_use]
    pub fn with_length(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Set a seed.
    #[must_use]
    pub const fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate a sequence according to this config.
    #[must_use]
    pub fn generate(&self) -> Vec<Move> {
        match self.seed {
            Some(seed) => generate_with(self.length, &mut StdRng::seed_from_u64(seed)),
            None => generate_with(self.length, &mut rand::thread_rng()),
        }
    }
}

/// Draw `length` moves uniformly over faces and turn amounts.
///
/// A face equal to the previous move's face is redrawn, so no two
/// consecutive moves share a face. Opposite-face pairs are allowed.
pub fn generate_with<R: Rng>(length: usize, rng: &mut R) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(length);
    for _ in 0..length {
        let previous = moves.last().map(|mv| mv.face);
        let mut face = Face::ALL[rng.gen_range(0..Face::ALL.len())];
        while Some(face) == previous {
            face = Face::ALL[rng.gen_range(0..Face::ALL.len())];
        }
        let turn = Turn::ALL[rng.gen_range(0..Turn::ALL.len())];
        moves.push(Move::new(face, turn));
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_respected() {
        assert_eq!(ScrambleConfig::default().generate().len(), 20);
        assert_eq!(ScrambleConfig::with_length(7).generate().len(), 7);
        assert!(ScrambleConfig::with_length(0).generate().is_empty());
    }

    #[test]
    fn test_no_consecutive_same_face() {
        for seed in 0..200 {
            let moves = ScrambleConfig::with_length(40).seeded(seed).generate();
            for pair in moves.windows(2) {
                assert_ne!(pair[0].face, pair[1].face, "seed {seed}: {pair:?}");
            }
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = ScrambleConfig::default().seeded(42).generate();
        let b = ScrambleConfig::default().seeded(42).generate();
        let c = ScrambleConfig::default().seeded(43).generate();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_all_faces_and_turns_appear() {
        let moves = ScrambleConfig::with_length(500).seeded(7).generate();
        for face in Face::ALL {
            assert!(moves.iter().any(|m| m.face == face), "missing {face}");
        }
        for turn in Turn::ALL {
            assert!(moves.iter().any(|m| m.turn == turn), "missing {turn:?}");
        }
    }
}
