// Facility Sim - Random source capability
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Injectable source of randomness.
//!
//! The model never reaches for a thread-local generator: every draw goes
//! through the [`RandomSource`] it was constructed with. Any `rand::Rng`
//! qualifies, so `StdRng::seed_from_u64` gives reproducible runs.

use crate::catalog::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, Normal};

/// Uniform and normal draws used by the simulation stages.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Draw from a normal distribution.
    ///
    /// An invalid deviation (negative or non-finite) yields the mean.
    fn normal(&mut self, distribution: &Distribution) -> f64;

    /// Bernoulli decision: true iff a fresh uniform draw is `<= probability`.
    fn decide(&mut self, probability: f64) -> bool {
        self.uniform() <= probability
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn normal(&mut self, distribution: &Distribution) -> f64 {
        match Normal::new(distribution.mean, distribution.std_dev) {
            Ok(normal) => normal.sample(self),
            Err(_) => distribution.mean,
        }
    }
}

/// Seeded generator for reproducible runs.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator seeded from the operating system.
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}
