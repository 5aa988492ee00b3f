//! Injectable randomness.
//!
//! Every random draw in the simulation (particle attributes, spawn
//! positions, burst jitter, palette picks) goes through [`RandomSource`], so
//! a seeded generator or a scripted sequence can stand in during tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random numbers.
pub trait RandomSource {
    /// A uniform draw from `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// A uniform draw from `[lo, hi)`. Returns `lo` for an empty range.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        (lo + (hi - lo) * self.next_unit()).min(hi)
    }

    /// A uniform index into a collection of `len` items. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

impl<R: Rng> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// A `StdRng` seeded from `seed`, or from OS entropy when `None`.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None    => StdRng::from_entropy(),
    }
}
