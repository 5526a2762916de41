use anyhow::Result;

use crate::{
    config::DesignerConfig,
    error::invalid_input,
    map::{SeedRegion, UnitTable},
    partition::{Deviation, Fitness},
};

/// Everything a partition needs to decode and score itself.
///
/// Built once per run and shared between partitions through an `Arc`.
#[derive(Clone, Debug)]
pub struct ZoningProblem {
    table: UnitTable,
    region: SeedRegion,
    num_zones: usize,
    fitness: Fitness,
}

impl ZoningProblem {
    /// Validate the zone count and population against the table and derive the fitness terms.
    pub fn new(table: UnitTable, region: SeedRegion, config: &DesignerConfig) -> Result<Self> {
        config.validate()?;

        if config.num_zones > table.len() {
            invalid_input!("num_zones ({}) exceeds the number of districts ({})", config.num_zones, table.len())
        }
        let total = table.total_population();
        if total <= 0.0 { invalid_input!("total population must be positive, got {total}") }

        let fitness = Fitness {
            mean_target: total / config.num_zones as f64,
            deviation: Deviation::from_margin(config.zone_value_margin),
            cost_weight: config.cost_weight,
            unconnected_weight: config.unconnected_weight,
            singleton_cost: config.singleton_cost,
        };

        Ok(Self { table, region, num_zones: config.num_zones, fitness })
    }

    #[inline] pub fn table(&self) -> &UnitTable { &self.table }

    #[inline] pub fn region(&self) -> &SeedRegion { &self.region }

    #[inline] pub fn num_zones(&self) -> usize { self.num_zones }

    #[inline] pub fn fitness(&self) -> &Fitness { &self.fitness }

    /// Population each zone should ideally hold.
    #[inline] pub fn mean_target(&self) -> f64 { self.fitness.mean_target }

    /// Fail unless `config` carries the scoring terms this problem was built with.
    pub fn check_scoring(&self, config: &DesignerConfig) -> Result<()> {
        let fitness = &self.fitness;
        let mismatch = [
            ("cost_weight", config.cost_weight, fitness.cost_weight),
            ("unconnected_weight", config.unconnected_weight, fitness.unconnected_weight),
            ("singleton_cost", config.singleton_cost, fitness.singleton_cost),
        ].into_iter().find(|(_, given, used)| given != used);

        if let Some((name, given, used)) = mismatch {
            invalid_input!("config {name} is {given} but the problem scores with {used}")
        }
        if Deviation::from_margin(config.zone_value_margin) != fitness.deviation {
            invalid_input!("config zone_value_margin {} does not match the problem's deviation", config.zone_value_margin)
        }
        Ok(())
    }
}
