//! Seeded random source used by production runs.

use hulkgen_core::RandomSource;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha8-backed [`RandomSource`] that remembers the seed it was built from
/// so runs can be reproduced.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    /// Creates a source seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a source from an operating-system seed.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = ChaCha8Rng::from_entropy().next_u64();
        Self::new(seed)
    }

    /// Seed the source was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn draw_range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn draw_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
