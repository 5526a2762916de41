use std::{collections::HashMap, sync::Arc, time::Instant};

use anyhow::Result;
use geo::MultiPolygon;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

use crate::{
    config::DesignerConfig,
    designer::{CancelToken, DesignReport, DesignerState, GenerationReport, Termination},
    error::DesignError,
    map::{SeedRegion, UnitRecord, UnitTable},
    partition::{Partition, PartitionSnapshot, ZoningProblem},
};

/// Genetic-algorithm driver: evolves a population of partitions towards
/// balanced, contiguous zones.
#[derive(Debug)]
pub struct PartitionDesigner {
    pub(super) config: DesignerConfig,
    pub(super) problem: Arc<ZoningProblem>,
    pub(super) rng: StdRng,
    pub(super) seed: u64,
    pub(super) state: DesignerState,
    pub(super) population: Vec<Partition>, // sorted by score once evaluated
    pub(super) best: Option<Partition>,
    pub(super) history: Vec<f64>,
    pub(super) iteration: usize,
    pub(super) stale: usize, // generations since the last strict improvement
    pub(super) reference_score: f64, // best score at the last checkpoint
    pub(super) termination: Option<Termination>,
    pub(super) cancel: CancelToken,
    pub(super) started: Option<Instant>,
}

impl PartitionDesigner {
    /// Validate all inputs and build a designer. No population is created yet.
    pub fn new(records: Vec<UnitRecord>, region: MultiPolygon<f64>, config: DesignerConfig) -> Result<Self> {
        config.validate()?;
        let table = UnitTable::new(records)?;
        let region = SeedRegion::new(region)?;
        let problem = ZoningProblem::new(table, region, &config)?;
        Self::from_problem(Arc::new(problem), config)
    }

    /// Build a designer over an already validated problem.
    /// `config.num_zones` is ignored in favour of the problem's; the scoring
    /// terms must match the ones the problem was built with.
    pub fn from_problem(problem: Arc<ZoningProblem>, config: DesignerConfig) -> Result<Self> {
        let config = DesignerConfig { num_zones: problem.num_zones(), ..config };
        config.validate()?;
        problem.check_scoring(&config)?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!(
            "{} districts, {} zones, population {} (target {:.1} per zone), rng seed {seed}",
            problem.table().len(),
            problem.num_zones(),
            problem.table().total_population(),
            problem.mean_target(),
        );

        Ok(Self {
            config,
            problem,
            rng: StdRng::seed_from_u64(seed),
            seed,
            state: DesignerState::Uninitialized,
            population: Vec::new(),
            best: None,
            history: Vec::new(),
            iteration: 0,
            stale: 0,
            reference_score: f64::INFINITY,
            termination: None,
            cancel: CancelToken::new(),
            started: None,
        })
    }

    #[inline] pub fn config(&self) -> &DesignerConfig { &self.config }

    #[inline] pub fn problem(&self) -> &Arc<ZoningProblem> { &self.problem }

    #[inline] pub fn state(&self) -> DesignerState { self.state }

    /// RNG seed in use (drawn at construction when the config has none).
    #[inline] pub fn seed(&self) -> u64 { self.seed }

    /// Generations completed.
    #[inline] pub fn iteration(&self) -> usize { self.iteration }

    #[inline] pub fn termination(&self) -> Option<Termination> { self.termination }

    /// Current population, best first once evaluated.
    #[inline] pub fn population(&self) -> &[Partition] { &self.population }

    /// Best score before each generation, oldest first.
    #[inline] pub fn score_history(&self) -> &[f64] { &self.history }

    /// Handle that stops `fit` at the next generation boundary.
    #[inline] pub fn cancel_token(&self) -> CancelToken { self.cancel.clone() }

    /// Best partition found so far.
    pub fn best(&self) -> Result<&Partition> {
        Ok(self.best.as_ref().ok_or(DesignError::NotReady("best partition"))?)
    }

    pub fn best_score(&self) -> Result<f64> { self.best()?.score() }

    pub fn best_snapshot(&self) -> Result<PartitionSnapshot> { self.best()?.snapshot() }

    /// District code to zone index for the best partition.
    pub fn district_zones(&self) -> Result<HashMap<String, usize>> { self.best()?.assignments() }

    /// Bundle configuration, outcome and best partition for output.
    pub fn report(&self) -> Result<DesignReport> {
        Ok(DesignReport {
            config: self.config.clone(),
            seed: self.seed,
            state: self.state,
            termination: self.termination,
            iterations: self.iteration,
            elapsed_secs: self.started.map_or(0.0, |t| t.elapsed().as_secs_f64()),
            best: self.best_snapshot()?,
            score_history: self.history.clone(),
        })
    }

    /// Run the whole GA. Returns why it stopped.
    pub fn fit(&mut self) -> Result<Termination> {
        self.fit_with(|_| {})
    }

    /// Run the whole GA, calling `observer` after every generation.
    ///
    /// Initializes the population if needed. Cancellation and the time limit
    /// are checked between generations.
    pub fn fit_with<F: FnMut(&GenerationReport)>(&mut self, mut observer: F) -> Result<Termination> {
        if self.state == DesignerState::Uninitialized { self.initialize()? }

        while !self.state.is_terminal() {
            if let Some(reason) = self.interruption() {
                self.finish(reason);
                break;
            }
            let report = self.step()?;
            observer(&report);
        }

        let termination = self.termination.ok_or(DesignError::InvalidState("run ended without a reason".into()))?;
        if self.iteration % self.log_period() != 0 {
            info!("iteration {}: best score {:.6}", self.iteration, self.best_score()?);
        }
        info!("stopped after {} iterations ({termination:?})", self.iteration);
        Ok(termination)
    }

    /// External stop conditions, checked between generations.
    fn interruption(&self) -> Option<Termination> {
        if self.cancel.is_cancelled() { return Some(Termination::Cancelled) }
        match (self.config.time_limit(), self.started) {
            (Some(limit), Some(started)) if started.elapsed() >= limit => Some(Termination::TimeLimit),
            _ => None,
        }
    }

    pub(super) fn finish(&mut self, reason: Termination) {
        self.termination = Some(reason);
        self.state = reason.state();
    }

    /// Generations between periodic progress lines.
    #[inline]
    pub(super) fn log_period(&self) -> usize {
        (self.config.max_iterations / 10).max(1)
    }
}
