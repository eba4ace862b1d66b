//! Seedable uniform PRNG (C1).
//!
//! Every [`crate::optimizer_job::OptimizerJob`] owns one `RandomSource`; they
//! are never shared across jobs (spec.md §5 — "PRNGs: one per job; never
//! shared"). Grounded on the teacher's per-instance-seeded `StdRng` pattern
//! in `algorithms/rl/environment.rs` (`StdRng::seed_from_u64`).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A seedable uniform random source: floats in `[0, 1)`, integers in `[0, n]`.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    seed: u64,
}

impl RandomSource {
    /// Creates a source seeded deterministically from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a source seeded from entropy (non-reproducible).
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().gen();
        Self::new(seed)
    }

    /// A uniform float in `[0, 1)`.
    pub fn uniform01(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }

    /// A uniform integer in `[0, n]` inclusive.
    ///
    /// `n == 0` always returns `0` (a single-choice draw).
    pub fn uniform_int(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..=n)
    }

    /// Draws a fresh seed and re-seeds this source in place, discarding the
    /// old generator state. Used by `OptimizerJob::reseed()` (spec.md §4.7).
    pub fn reseed(&mut self) {
        let new_seed = self.rng.gen();
        self.seed = new_seed;
        self.rng = StdRng::seed_from_u64(new_seed);
    }

    /// The seed this source was last (re)seeded with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
