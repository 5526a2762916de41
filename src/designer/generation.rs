use std::time::Instant;

use anyhow::Result;
use rand::{Rng, seq::IndexedRandom};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    designer::{DesignerState, GenerationReport, PartitionDesigner, Termination},
    error::invalid_state,
    partition::Partition,
};

impl PartitionDesigner {
    /// Create, decode and evaluate the initial population.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != DesignerState::Uninitialized {
            invalid_state!("initialize called in state {:?}", self.state)
        }
        self.started = Some(Instant::now());

        let mut population = Vec::with_capacity(self.config.population_cardinality);
        for _ in 0..self.config.population_cardinality {
            let mut partition = Partition::new(self.problem.clone());
            partition.generate_genotype(&mut self.rng)?;
            population.push(partition);
        }
        self.population = population;
        self.state = DesignerState::PopulationGenerated;

        self.population.par_iter_mut().try_for_each(|p| p.compose_partition())?;
        self.state = DesignerState::ParentsComposed;

        self.population.par_iter_mut().try_for_each(|p| p.evaluate().map(drop))?;
        sort_by_score(&mut self.population);
        self.state = DesignerState::ParentsEvaluated;

        let best = self.population[0].clone();
        let score = best.score()?;
        self.best = Some(best);
        self.reference_score = score;
        info!("initial best score {score:.6}");

        self.check_limits();
        Ok(())
    }

    /// Run one generation: select, cross, mutate, evaluate, merge.
    pub fn step(&mut self) -> Result<GenerationReport> {
        if !self.state.is_ready_for_step() {
            invalid_state!("step called in state {:?}", self.state)
        }

        let couples = select_couples(&self.population, self.config.tournament_size, &mut self.rng);
        self.state = DesignerState::ParentsSelected;

        let mut offspring = Vec::with_capacity(self.population.len());
        for (dad, mum) in couples {
            if self.rng.random::<f64>() < self.config.crossover_prob {
                let (son, daughter) = self.population[dad].crossover(&self.population[mum], &mut self.rng)?;
                offspring.push(son);
                offspring.push(daughter);
            }
        }
        self.state = DesignerState::OffspringCrossed;

        for child in &mut offspring {
            child.mutate(self.config.mutation_prob, &mut self.rng)?;
        }
        self.state = DesignerState::OffspringMutated;

        offspring.par_iter_mut().try_for_each(|p| p.compose_partition())?;
        self.state = DesignerState::OffspringComposed;

        offspring.par_iter_mut().try_for_each(|p| p.evaluate().map(drop))?;
        self.state = DesignerState::OffspringEvaluated;

        let produced = offspring.len();
        let parents = std::mem::take(&mut self.population);
        self.population = next_generation(parents, offspring, self.config.elitism_hold_fraction);
        self.state = DesignerState::NextGenerationSelected;

        let improved = self.track_best()?;
        self.iteration += 1;

        let best_score = self.best_score()?;
        let checkpoint = self.iteration % self.log_period() == 0
            || self.reference_score - best_score > self.config.log_improvement_fraction * self.reference_score;
        if checkpoint {
            info!("iteration {}: best score {best_score:.6}", self.iteration);
            self.reference_score = best_score;
        }
        debug!(
            iteration = self.iteration,
            offspring = produced,
            generation_best = self.population[0].rank(),
            best_score,
            improved,
            "generation done"
        );

        self.check_limits();
        Ok(GenerationReport {
            iteration: self.iteration,
            best_score,
            improved,
            offspring: produced,
            stale_iterations: self.stale,
            checkpoint,
            best_snapshot: if checkpoint { Some(self.best_snapshot()?) } else { None },
            elapsed: self.started.map(|t| t.elapsed()).unwrap_or_default(),
        })
    }

    /// Record the previous best in the history and adopt the generation's
    /// best on strict improvement.
    fn track_best(&mut self) -> Result<bool> {
        let previous = self.best_score()?;
        self.history.push(previous);

        let candidate = &self.population[0];
        if candidate.score()?.total_cmp(&previous).is_lt() {
            self.best = Some(candidate.clone());
            self.stale = 0;
            Ok(true)
        } else {
            self.stale += 1;
            Ok(false)
        }
    }

    /// Switch to a terminal state when a generation limit is reached.
    fn check_limits(&mut self) {
        if self.iteration >= self.config.max_iterations {
            self.finish(Termination::IterationCap);
        } else if self.stale >= self.config.no_improvement_iterations {
            self.finish(Termination::NoImprovement);
        }
    }
}

/// Order partitions best (lowest score) first.
pub(crate) fn sort_by_score(partitions: &mut [Partition]) {
    partitions.sort_by(|a, b| a.rank().total_cmp(&b.rank()));
}

/// Tournament winner among `k` draws (with replacement) from `candidates`.
/// Ties keep the earliest draw.
fn tournament<R: Rng + ?Sized>(population: &[Partition], candidates: &[usize], k: usize, rng: &mut R) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for _ in 0..k {
        let &pick = candidates.choose(rng)?;
        if winner.is_none_or(|w| population[pick].rank() < population[w].rank()) {
            winner = Some(pick);
        }
    }
    winner
}

/// Draw `population.len() / 2` parent couples by tournament. A partition
/// chosen as a parent is not a candidate for later picks in the same pass.
pub(crate) fn select_couples<R: Rng + ?Sized>(population: &[Partition], k: usize, rng: &mut R) -> Vec<(usize, usize)> {
    let mut candidates: Vec<usize> = (0..population.len()).collect();
    let mut claim = |rng: &mut R| {
        let winner = tournament(population, &candidates, k, rng)?;
        candidates.retain(|&i| i != winner);
        Some(winner)
    };

    let mut couples = Vec::with_capacity(population.len() / 2);
    for _ in 0..population.len() / 2 {
        let (Some(dad), Some(mum)) = (claim(&mut *rng), claim(&mut *rng)) else { break };
        couples.push((dad, mum));
    }
    couples
}

/// Elitist merge: keep the best `pop - n_children` parents and the best
/// `n_children = min(floor((1 - hold) * pop), offspring.len())` children.
pub(crate) fn next_generation(mut parents: Vec<Partition>, mut offspring: Vec<Partition>, hold: f64) -> Vec<Partition> {
    let size = parents.len();
    sort_by_score(&mut parents);
    sort_by_score(&mut offspring);

    let n_children = (((1.0 - hold) * size as f64).floor() as usize).min(offspring.len());
    parents.truncate(size - n_children);
    offspring.truncate(n_children);

    parents.extend(offspring);
    sort_by_score(&mut parents);
    parents
}
