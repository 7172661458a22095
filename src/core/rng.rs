//! Server-side dice.
//!
//! The match's `DiceRng` is the single point of randomness in the core:
//! roll values are never accepted from clients. Production matches seed
//! from process entropy; tests and replays seed explicitly.
//!
//! The generator state serializes in O(1) (seed plus ChaCha word position),
//! so a match restored from a snapshot continues the exact roll sequence it
//! would have produced.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Unbiased six-sided die backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct DiceRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DiceRng {
    /// Create a generator with an explicit seed.
    ///
    /// Same seed, same roll sequence. Used by tests and replays.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator seeded from process entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Roll the die: a uniform value in `1..=6`.
    pub fn roll(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    /// Capture the generator state for a snapshot.
    #[must_use]
    pub fn state(&self) -> DiceRngState {
        DiceRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Rebuild a generator from a snapshot state.
    #[must_use]
    pub fn from_state(state: &DiceRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable generator state.
///
/// The word position is a 128-bit stream offset, so capture cost does not
/// depend on how many rolls have been made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRngState {
    /// Original seed.
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
}
