//! Injectable randomness for the game engines.
//!
//! Every engine draws its randomness through [`RandomSource`], whose only
//! required method yields a uniform float in `[0, 1)`. Everything else
//! (indices, coin flips, shuffles) is derived from that one primitive so a
//! recorded sequence of floats fully determines a game.
//!
//! - [`GameRng`]: seeded ChaCha8 generator for production use
//! - [`ScriptedRng`]: replays a fixed list of floats, for tests and replays
//!
//! ```
//! use pocket_arcade::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_index(100), b.gen_index(100));
//!
//! // Each game gets its own stream derived from the same root seed.
//! let mut snake = a.for_context("snake");
//! let roll = snake.next_f64();
//! assert!((0.0..1.0).contains(&roll));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Source of uniform randomness consumed by the engines.
pub trait RandomSource {
    /// Next uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    fn gen_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick an index from an empty range");
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }

    /// `true` with the given probability.
    fn gen_bool(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform in-place shuffle (Fisher–Yates).
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_index(i + 1);
            slice.swap(i, j);
        }
    }

    /// Choose a random element from a slice.
    fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            Some(&slice[self.gen_index(slice.len())])
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Deterministic seeded RNG.
///
/// Uses ChaCha8 for speed while keeping a high-quality stream. The stream
/// position can be captured with [`GameRng::state`] and restored later.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derive an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed,
    /// so each game in the arcade can own its own sequence.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);

        Self::new(hasher.finish())
    }

    /// Seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Serializable RNG position for checkpointing.
///
/// Uses the ChaCha8 word position so capture is O(1) regardless of how many
/// values have been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// Words consumed from the ChaCha8 stream.
    pub word_pos: u128,
}

/// Replays a recorded sequence of floats, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` so any script is a valid source.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
    drawn: usize,
}

impl ScriptedRng {
    /// Create a scripted source. An empty script always yields `0.0`.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
            drawn: 0,
        }
    }

    /// Number of values drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.drawn += 1;
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
