//! Seeded random stream shared by every generation stage, plus seed mixing.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// The single random source of one generation pass.
pub struct MapRng {
    inner: ChaCha8Rng,
}

impl MapRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform value in `0..bound`.
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        ((u128::from(self.next_u64()) * bound as u128) >> 64) as usize
    }

    /// Uniform value in `min..max_exclusive`.
    pub fn range(&mut self, min: usize, max_exclusive: usize) -> usize {
        debug_assert!(min < max_exclusive);
        min + self.below(max_exclusive - min)
    }

    /// Uniform value in `min..=max`.
    pub fn range_inclusive(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max);
        min + self.below(max - min + 1)
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1_u32 << 24) as f32
    }

    /// Uniform value in `[min, max)`.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit_f32() * (max - min)
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit_f32() < probability
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in 0..items.len() {
            let swap_with = self.range(index, items.len());
            items.swap(index, swap_with);
        }
    }
}

pub(crate) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

/// Seed for the `attempt`-th regeneration of a map. Attempt 0 keeps the seed.
pub fn derive_attempt_seed(seed: u64, attempt: u32) -> u64 {
    if attempt == 0 {
        return seed;
    }
    mix_seed_stream(seed, u64::from(attempt))
}
