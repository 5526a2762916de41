use std::sync::Arc;

use anyhow::Result;
use geo::Point;
use rand::Rng;

use crate::{error::invalid_state, partition::Partition};

impl Partition {
    /// Single-point crossover at a random cut in `[1, num_zones - 1]`.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Partition, rng: &mut R) -> Result<(Partition, Partition)> {
        let n = self.check_mates(other)?;
        self.crossover_at(other, rng.random_range(1..n))
    }

    /// Swap genotype tails at `cut`: `(self[..cut] + other[cut..], other[..cut] + self[cut..])`.
    /// Children are undecoded.
    pub fn crossover_at(&self, other: &Partition, cut: usize) -> Result<(Partition, Partition)> {
        let n = self.check_mates(other)?;
        if !(1..n).contains(&cut) { invalid_state!("crossover cut {cut} is outside [1, {}]", n - 1) }

        let splice = |head: &[Point<f64>], tail: &[Point<f64>]| {
            let genotype = head[..cut].iter().chain(&tail[cut..]).copied().collect();
            Partition::with_seeds(self.problem.clone(), genotype)
        };
        Ok((splice(&self.genotype, &other.genotype), splice(&other.genotype, &self.genotype)))
    }

    /// Both parents must share a problem and have full genotypes of at least two seeds.
    fn check_mates(&self, other: &Partition) -> Result<usize> {
        if !Arc::ptr_eq(&self.problem, &other.problem) { invalid_state!("cannot cross partitions of different problems") }
        let n = self.problem.num_zones();
        if self.genotype.len() != n || other.genotype.len() != n {
            invalid_state!("cannot cross genotypes of length {} and {} (expected {n})", self.genotype.len(), other.genotype.len())
        }
        if n < 2 { invalid_state!("crossover needs at least two seeds") }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        DesignError,
        testing::{lattice_records, problem, rect_region},
    };

    fn parents() -> (Partition, Partition) {
        let problem = problem(lattice_records(5, 5, 1.0), rect_region(5.0, 5.0), 5);
        let p1 = (0..5).map(|i| Point::new(i as f64 + 0.1, 0.1)).collect();
        let p2 = (0..5).map(|i| Point::new(i as f64 + 0.9, 4.9)).collect();
        (
            Partition::from_genotype(problem.clone(), p1).unwrap(),
            Partition::from_genotype(problem, p2).unwrap(),
        )
    }

    #[test]
    fn swaps_tails_at_cut() {
        let (p1, p2) = parents();
        let (c1, c2) = p1.crossover_at(&p2, 2).unwrap();

        assert_eq!(&c1.genotype()[..2], &p1.genotype()[..2]);
        assert_eq!(&c1.genotype()[2..], &p2.genotype()[2..]);
        assert_eq!(&c2.genotype()[..2], &p2.genotype()[..2]);
        assert_eq!(&c2.genotype()[2..], &p1.genotype()[2..]);
        assert!(!c1.is_composed() && !c2.is_evaluated());
    }

    #[test]
    fn random_cut_keeps_both_parents_represented() {
        let (p1, p2) = parents();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let (c1, _) = p1.crossover(&p2, &mut rng).unwrap();
            assert_eq!(c1.genotype()[0], p1.genotype()[0]);
            assert_eq!(c1.genotype()[4], p2.genotype()[4]);
        }
    }

    #[test]
    fn rejects_out_of_range_cuts() {
        let (p1, p2) = parents();
        for cut in [0, 5, 9] {
            let err = p1.crossover_at(&p2, cut).unwrap_err();
            assert!(matches!(err.downcast_ref::<DesignError>(), Some(DesignError::InvalidState(_))));
        }
    }

    #[test]
    fn rejects_partitions_of_other_problems() {
        let (p1, _) = parents();
        let (_, p2) = parents();
        assert!(p1.crossover_at(&p2, 1).is_err());
    }
}
