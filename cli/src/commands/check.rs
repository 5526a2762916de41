use std::sync::Arc;

use anyhow::Result;
use zonedesign::{SeedRegion, UnitTable, ZoningProblem};

use crate::commands::{build_config, load_inputs};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::CheckArgs) -> Result<()> {
    let config = build_config(&args.tuning)?;
    let (records, region) = load_inputs(&args.inputs)?;

    let table = UnitTable::new(records)?;
    let region = SeedRegion::new(region)?;

    let isolated = (0..table.len()).filter(|&i| table.degree(i) == 0).count();
    let outside = table.units().iter().filter(|unit| !region.contains(&unit.centroid())).count();
    let asymmetric = table.asymmetric_links();

    println!("districts:          {}", table.len());
    println!("total population:   {}", table.total_population());
    println!("neighbour links:    {}", table.link_count());
    println!("asymmetric links:   {asymmetric}");
    println!("isolated districts: {isolated}");
    println!("centroids outside:  {outside}");

    let problem = Arc::new(ZoningProblem::new(table, region, &config)?);
    println!("zones:              {}", problem.num_zones());
    println!("target per zone:    {:.1}", problem.mean_target());

    if asymmetric > 0 { tracing::warn!("{asymmetric} neighbour links have no matching reverse link") }
    if isolated > 0 { tracing::warn!("{isolated} districts have no neighbours and will count as unconnected parts") }
    Ok(())
}
