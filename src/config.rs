use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::invalid_input;

/// Hyperparameters for one zone design run.
///
/// A single immutable value passed into the designer at construction. Every
/// field has a default, so a JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignerConfig {
    /// Number of zones to build (>= 2, <= number of districts).
    pub num_zones: usize,
    /// GA population size (even, > 0).
    pub population_cardinality: usize,
    /// Probability that a parent couple produces offspring.
    pub crossover_prob: f64,
    /// Per-seed probability of replacement during mutation.
    pub mutation_prob: f64,
    /// Number of adversaries sampled per tournament.
    pub tournament_size: usize,
    /// Fraction of the population reserved for the best parents.
    pub elitism_hold_fraction: f64,
    /// Tolerable fractional deviation from the mean zone population.
    pub zone_value_margin: f64,
    /// Hard cap on generations.
    pub max_iterations: usize,
    /// Stop after this many generations without a strict improvement.
    pub no_improvement_iterations: usize,
    /// Weight of the mean connectivity cost in the fitness.
    pub cost_weight: f64,
    /// Weight of each unconnected zone part in the fitness.
    pub unconnected_weight: f64,
    /// Connectivity cost given to zones with at most one district.
    pub singleton_cost: f64,
    /// Relative best-score improvement that triggers a progress log line.
    pub log_improvement_fraction: f64,
    /// Wall-clock budget for the whole run, in seconds.
    pub time_limit_secs: Option<f64>,
    /// RNG seed; a random one is drawn (and logged) when absent.
    pub seed: Option<u64>,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            num_zones: 2,
            population_cardinality: 50,
            crossover_prob: 0.95,
            mutation_prob: 0.05,
            tournament_size: 4,
            elitism_hold_fraction: 0.10,
            zone_value_margin: 0.20,
            max_iterations: 1000,
            no_improvement_iterations: 100,
            cost_weight: 0.10,
            unconnected_weight: 10.0,
            singleton_cost: 0.8,
            log_improvement_fraction: 0.01,
            time_limit_secs: None,
            seed: None,
        }
    }
}

impl DesignerConfig {
    /// Read a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("[config] Failed to parse config file: {}", path.display()))
    }

    /// Wall-clock budget, if any.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs_f64)
    }

    /// Check the parameters that do not depend on the input data.
    /// `num_zones` is checked against the district count by the designer.
    pub fn validate(&self) -> Result<()> {
        fn check_prob(name: &str, value: f64) -> Result<()> {
            if !(0.0..=1.0).contains(&value) { invalid_input!("{name} must be in [0, 1], got {value}") }
            Ok(())
        }

        if self.num_zones < 2 { invalid_input!("num_zones must be at least 2, got {}", self.num_zones) }
        if self.population_cardinality == 0 || self.population_cardinality % 2 != 0 {
            invalid_input!("population_cardinality must be an even positive integer, got {}", self.population_cardinality)
        }
        check_prob("crossover_prob", self.crossover_prob)?;
        check_prob("mutation_prob", self.mutation_prob)?;
        check_prob("elitism_hold_fraction", self.elitism_hold_fraction)?;
        check_prob("singleton_cost", self.singleton_cost)?;
        if self.tournament_size == 0 { invalid_input!("tournament_size must be at least 1") }
        if !(self.zone_value_margin.is_finite() && self.zone_value_margin > 0.0) {
            invalid_input!("zone_value_margin must be a positive number, got {}", self.zone_value_margin)
        }
        for (name, weight) in [
            ("cost_weight", self.cost_weight),
            ("unconnected_weight", self.unconnected_weight),
            ("log_improvement_fraction", self.log_improvement_fraction),
        ] {
            if !(weight.is_finite() && weight >= 0.0) { invalid_input!("{name} must be a non-negative number, got {weight}") }
        }
        if let Some(secs) = self.time_limit_secs {
            if !(secs.is_finite() && secs > 0.0) { invalid_input!("time_limit_secs must be positive, got {secs}") }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::DesignError;

    fn input_error(config: DesignerConfig) -> String {
        let err = config.validate().unwrap_err();
        match err.downcast_ref::<DesignError>() {
            Some(DesignError::InvalidInput(msg)) => msg.clone(),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn default_is_valid() {
        DesignerConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_odd_or_zero_population() {
        assert!(input_error(DesignerConfig { population_cardinality: 7, ..Default::default() })
            .contains("population_cardinality"));
        assert!(input_error(DesignerConfig { population_cardinality: 0, ..Default::default() })
            .contains("population_cardinality"));
    }

    #[test]
    fn rejects_out_of_range_probabilities() {
        assert!(input_error(DesignerConfig { crossover_prob: 1.5, ..Default::default() }).contains("crossover_prob"));
        assert!(input_error(DesignerConfig { mutation_prob: -0.1, ..Default::default() }).contains("mutation_prob"));
        assert!(input_error(DesignerConfig { elitism_hold_fraction: f64::NAN, ..Default::default() })
            .contains("elitism_hold_fraction"));
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert!(input_error(DesignerConfig { num_zones: 1, ..Default::default() }).contains("num_zones"));
        assert!(input_error(DesignerConfig { tournament_size: 0, ..Default::default() }).contains("tournament_size"));
        assert!(input_error(DesignerConfig { zone_value_margin: 0.0, ..Default::default() }).contains("zone_value_margin"));
        assert!(input_error(DesignerConfig { unconnected_weight: -1.0, ..Default::default() }).contains("unconnected_weight"));
        assert!(input_error(DesignerConfig { time_limit_secs: Some(0.0), ..Default::default() }).contains("time_limit_secs"));
    }

    #[test]
    fn json_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "num_zones": 5, "population_cardinality": 20, "seed": 42 }}"#).unwrap();

        let config = DesignerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.num_zones, 5);
        assert_eq!(config.population_cardinality, 20);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.tournament_size, DesignerConfig::default().tournament_size);
    }

    #[test]
    fn json_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "num_zone": 5 }}"#).unwrap();
        assert!(DesignerConfig::from_json_file(file.path()).is_err());
    }
}
