use rand::{Rng, SeedableRng as _, distr::StandardUniform, prelude::Distribution};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::core::piece::Piece;

/// Seed for deterministic piece generation.
///
/// Using the same seed reproduces the same sequence of pieces and tints,
/// enabling:
///
/// - Reproducible gameplay for debugging
/// - Session recording and replay
/// - Deterministic testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PieceSeed(pub u64);

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        PieceSeed(rng.random())
    }
}

/// Cosmetic display identity for the settled stack and active piece.
///
/// Purely visual; the engine never reads it back. A new tint is sampled
/// uniformly at random on every level boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    /// The tint every session starts with.
    pub const INITIAL: Self = Self { r: 255, g: 0, b: 0 };
}

impl Distribution<Tint> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Tint {
        Tint {
            r: rng.random(),
            g: rng.random(),
            b: rng.random(),
        }
    }
}

/// Source of spawned pieces and cosmetic tints.
///
/// Each draw selects one of the 7 piece kinds uniformly at random and places
/// it at the canonical spawn position (top row, horizontally centered). There
/// is no bag or look-ahead state; the session keeps its own one-piece preview
/// by drawing `next` ahead of time.
#[derive(Debug, Clone)]
pub struct PieceSource {
    rng: Pcg32,
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource {
    /// Creates a piece source with a random seed.
    ///
    /// For deterministic generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but fully deterministic for the given seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed.0),
        }
    }

    /// Draws a new piece at its spawn position.
    pub fn next_piece(&mut self) -> Piece {
        Piece::spawn(self.rng.random())
    }

    /// Samples a new uniformly-random display tint.
    pub fn next_tint(&mut self) -> Tint {
        self.rng.random()
    }
}
