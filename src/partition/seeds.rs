use anyhow::Result;
use geo::Point;
use rand::Rng;

use crate::{error::DesignError, partition::Partition};

/// Upper bound on rejection-sampling draws for a single seed.
pub const MAX_SAMPLING_ATTEMPTS: usize = 100_000;

impl Partition {
    /// Draw `num_zones` distinct seeds uniformly inside the seed region.
    pub fn generate_genotype<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if !self.genotype.is_empty() { Err(DesignError::AlreadyInitialized)? }

        let num_zones = self.problem.num_zones();
        self.genotype.reserve(num_zones);
        for _ in 0..num_zones {
            let seed = self.sample_seed(rng)?;
            self.genotype.push(seed);
        }
        Ok(())
    }

    /// Replace each seed with probability `prob`, and any seed equal to an
    /// earlier one unconditionally. Returns the number of replaced seeds;
    /// decoded zones and score are dropped if it is non-zero.
    pub fn mutate<R: Rng + ?Sized>(&mut self, prob: f64, rng: &mut R) -> Result<usize> {
        let mut replaced = 0;
        for i in 0..self.genotype.len() {
            let roll = rng.random::<f64>() < prob;
            let collides = self.genotype[..i].contains(&self.genotype[i]);
            if roll || collides {
                self.genotype[i] = self.sample_seed(rng)?;
                replaced += 1;
            }
        }

        if replaced > 0 { self.reset() }
        Ok(replaced)
    }

    /// Rejection-sample a point inside the region that is not already a seed.
    fn sample_seed<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point<f64>> {
        let region = self.problem.region();
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let point = region.sample_in_bounds(rng);
            if region.contains(&point) && !self.genotype.contains(&point) {
                return Ok(point)
            }
        }
        Err(DesignError::SamplingExhausted { attempts: MAX_SAMPLING_ATTEMPTS }.into())
    }
}
