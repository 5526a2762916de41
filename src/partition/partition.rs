use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use geo::Point;
use rayon::prelude::*;

use crate::{
    error::{DesignError, invalid_input, invalid_state},
    partition::ZoningProblem,
    zone::Zone,
};

/// Above this many districts the nearest-seed search runs on the rayon pool.
pub const PARALLEL_DECODE_THRESHOLD: usize = 2048;

/// A candidate zoning: seed points (genotype), the zones they decode to, and a score.
#[derive(Clone, Debug)]
pub struct Partition {
    pub(super) genotype: Vec<Point<f64>>,
    pub(super) zones: Vec<Zone>,
    pub(super) score: Option<f64>,
    pub(super) problem: Arc<ZoningProblem>,
}

impl Partition {
    /// Construct a partition with no seeds yet.
    pub fn new(problem: Arc<ZoningProblem>) -> Self {
        Self { genotype: Vec::new(), zones: Vec::new(), score: None, problem }
    }

    /// Construct a partition from explicit seed points.
    pub fn from_genotype(problem: Arc<ZoningProblem>, genotype: Vec<Point<f64>>) -> Result<Self> {
        if genotype.len() != problem.num_zones() {
            invalid_input!("genotype has {} seeds, expected {}", genotype.len(), problem.num_zones())
        }
        Ok(Self::with_seeds(problem, genotype))
    }

    #[inline]
    pub(super) fn with_seeds(problem: Arc<ZoningProblem>, genotype: Vec<Point<f64>>) -> Self {
        Self { genotype, zones: Vec::new(), score: None, problem }
    }

    #[inline] pub fn problem(&self) -> &Arc<ZoningProblem> { &self.problem }

    #[inline] pub fn genotype(&self) -> &[Point<f64>] { &self.genotype }

    #[inline] pub fn zones(&self) -> &[Zone] { &self.zones }

    #[inline] pub fn is_composed(&self) -> bool { !self.zones.is_empty() }

    #[inline] pub fn is_evaluated(&self) -> bool { self.score.is_some() }

    /// Fitness score (lower is better); available after `evaluate`.
    pub fn score(&self) -> Result<f64> {
        Ok(self.score.ok_or(DesignError::NotReady("partition score"))?)
    }

    /// Sort key for ranking: the score, or +inf when not evaluated.
    #[inline] pub(crate) fn rank(&self) -> f64 { self.score.unwrap_or(f64::INFINITY) }

    /// Drop decoded zones and the score, keeping the genotype.
    pub fn reset(&mut self) {
        self.zones.clear();
        self.score = None;
    }

    /// Decode the genotype: assign every district to its nearest seed.
    pub fn compose_partition(&mut self) -> Result<()> {
        if self.is_composed() { Err(DesignError::AlreadyComposed)? }
        if self.genotype.len() != self.problem.num_zones() {
            invalid_state!("cannot compose {} seeds into {} zones", self.genotype.len(), self.problem.num_zones())
        }

        let units = self.problem.table().units();
        let seeds = &self.genotype;
        let nearest: Vec<(usize, f64)> = if units.len() > PARALLEL_DECODE_THRESHOLD {
            units.par_iter().map(|unit| nearest_seed(seeds, unit.centroid())).collect()
        } else {
            units.iter().map(|unit| nearest_seed(seeds, unit.centroid())).collect()
        };

        let mut zones: Vec<Zone> = self.genotype.iter().map(|&seed| Zone::new(seed)).collect();
        for (i, (zone, distance)) in nearest.into_iter().enumerate() {
            zones[zone].add_district(i, units[i].population(), distance)?;
        }
        self.zones = zones;
        Ok(())
    }

    /// Compute zone costs and the overall score.
    pub fn evaluate(&mut self) -> Result<f64> {
        if !self.is_composed() { invalid_state!("cannot evaluate a partition before it is composed") }

        let fitness = *self.problem.fitness();
        let table = self.problem.table();
        let mut total = 0.0;
        for zone in &mut self.zones {
            zone.calc_cost(table, fitness.singleton_cost);
            total += fitness.zone_score(zone)?;
        }

        let score = total / self.problem.num_zones() as f64;
        self.score = Some(score);
        Ok(score)
    }

    /// Zone index of every district, in table order.
    pub fn zone_of_units(&self) -> Result<Vec<usize>> {
        let table = self.problem.table();
        let mut assigned = vec![None; table.len()];
        for (z, zone) in self.zones.iter().enumerate() {
            for entry in zone.districts() {
                let slot = &mut assigned[entry.unit as usize];
                if slot.is_some() {
                    invalid_state!("district '{}' is assigned to more than one zone", table.unit(entry.unit as usize).code())
                }
                *slot = Some(z);
            }
        }

        assigned.into_iter().enumerate()
            .map(|(i, zone)| zone.ok_or_else(|| anyhow::Error::from(DesignError::UnmappedDistrict(table.unit(i).code().to_string()))))
            .collect()
    }

    /// Map every district code to its zone index.
    pub fn assignments(&self) -> Result<HashMap<String, usize>> {
        let table = self.problem.table();
        Ok(self.zone_of_units()?.into_iter().enumerate()
            .map(|(i, zone)| (table.unit(i).code().to_string(), zone))
            .collect())
    }
}

/// Index of and distance to the closest seed; the lowest index wins ties.
fn nearest_seed(seeds: &[Point<f64>], centroid: Point<f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, seed) in seeds.iter().enumerate() {
        let d = (seed.x() - centroid.x()).hypot(seed.y() - centroid.y());
        if d < best.1 { best = (i, d) }
    }
    best
}
