//! Random sources for per-cell transition draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform draws in `[0, 1)`, one per cell per tick.
pub trait RandomSource: Send {
    fn sample(&mut self) -> f64;

    /// Derive an independent stream, used to give each parallel row its own source.
    fn fork(&mut self) -> Self
    where
        Self: Sized;
}

/// Any `rand` generator as a random source
#[derive(Debug, Clone)]
pub struct RngSource<R = ChaCha8Rng>(pub R);

impl RngSource<ChaCha8Rng> {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

impl<R> RandomSource for RngSource<R>
where
    R: Rng + SeedableRng + Send,
{
    fn sample(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn fork(&mut self) -> Self {
        Self(R::seed_from_u64(self.0.gen()))
    }
}

/// Always returns the same value. Makes a step deterministic for tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSource(pub f64);

impl RandomSource for FixedSource {
    fn sample(&mut self) -> f64 {
        self.0
    }

    fn fork(&mut self) -> Self {
        *self
    }
}
