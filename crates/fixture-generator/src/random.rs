//! Seeded value source shared by every randomizer of a population session.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Multiplier used to spread per-index seeds (64-bit golden ratio).
const INDEX_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic random source.
///
/// A fixed seed reproduces the exact same sequence of draws, so the same
/// sequence of population calls yields the same object graphs. Implements
/// [`RngCore`], which makes every [`Rng`] method available on it.
#[derive(Debug, Clone)]
pub struct ValueSource {
    seed: u64,
    rng: StdRng,
}

impl ValueSource {
    /// Create a source seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed this source was created (or last reseeded) with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reset the source to the start of the sequence for `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Compute the seed of the independent source for element `index` of a batch.
    ///
    /// This allows any element of a batch to be generated on its own while
    /// maintaining determinism.
    pub fn seed_for_index(seed: u64, index: u64) -> u64 {
        seed.wrapping_add(index.wrapping_mul(INDEX_SEED_STRIDE))
    }

    /// Create the independent source for element `index` of a batch.
    pub fn for_index(&self, index: u64) -> Self {
        Self::new(Self::seed_for_index(self.seed, index))
    }

    /// Draw a uniform count in `[min, max]` (inclusive).
    pub fn count_in(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..=max)
    }
}

impl RngCore for ValueSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
