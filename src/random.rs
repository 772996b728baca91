// Every draw in a run goes through one seeded generator, so two engines built
// with the same seed replay the exact same trace.

use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

#[derive(Debug, Clone)]
pub struct RandomVariateGenerator {
    seed: u64,
    rng: StdRng,
}

impl RandomVariateGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws from Exponential(rate), mean `1 / rate`.
    pub fn sample_exponential(&mut self, rate: f64) -> Result<f64, ConfigError> {
        let dist = exponential(rate)?;
        Ok(self.sample(&dist))
    }

    /// Samples any distribution that was already validated at configuration time.
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        self.rng.sample(dist)
    }
}

/// Builds a validated exponential distribution.
pub fn exponential(rate: f64) -> Result<Exp<f64>, ConfigError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ConfigError::InvalidRate(rate));
    }
    Exp::new(rate).map_err(|_| ConfigError::InvalidRate(rate))
}
