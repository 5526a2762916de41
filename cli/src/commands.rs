pub mod check;
pub mod design;

use anyhow::Result;
use zonedesign::{DesignerConfig, UnitRecord, load_records, read_region_geojson};
use zonedesign::geo::MultiPolygon;

use crate::cli::{InputArgs, TuningArgs};

/// Load district records and the seed region named on the command line.
pub(crate) fn load_inputs(inputs: &InputArgs) -> Result<(Vec<UnitRecord>, MultiPolygon<f64>)> {
    tracing::info!("loading population from {}", inputs.population.display());
    tracing::info!("loading geodata from {}", inputs.geodata.display());
    let records = load_records(&inputs.population, &inputs.geodata)?;

    tracing::info!("loading seed region from {}", inputs.region.display());
    let region = read_region_geojson(&inputs.region)?;
    Ok((records, region))
}

/// Config file (or defaults) with command-line overrides applied.
pub(crate) fn build_config(tuning: &TuningArgs) -> Result<DesignerConfig> {
    let mut config = match &tuning.config {
        Some(path) => DesignerConfig::from_json_file(path)?,
        None => DesignerConfig::default(),
    };

    if let Some(v) = tuning.zones { config.num_zones = v }
    if let Some(v) = tuning.population_size { config.population_cardinality = v }
    if let Some(v) = tuning.max_iterations { config.max_iterations = v }
    if let Some(v) = tuning.no_improvement { config.no_improvement_iterations = v }
    if let Some(v) = tuning.seed { config.seed = Some(v) }
    if let Some(v) = tuning.time_limit { config.time_limit_secs = Some(v) }

    config.validate()?;
    Ok(config)
}
