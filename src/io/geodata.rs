//! Per-district geodata (centroid and neighbour lists) stored as JSON keyed by district code.

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    error::invalid_input,
    map::{Neighbor, UnitRecord},
};

/// Geodata for one district, as produced by the adjacency preprocessing step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistrictGeodata {
    #[serde(rename = "CENTROID")]
    pub centroid: [f64; 2],
    #[serde(rename = "NEIGHBOURS_CODE_LIST", default)]
    pub neighbour_codes: Vec<String>,
    /// Parallel to `neighbour_codes`.
    #[serde(rename = "NEIGHBOURS_COST_LIST", default)]
    pub neighbour_costs: Vec<f64>,
}

/// Read a geodata JSON object `{code: {CENTROID, NEIGHBOURS_CODE_LIST, NEIGHBOURS_COST_LIST}}`.
pub fn read_geodata_json(path: &Path) -> Result<HashMap<String, DistrictGeodata>> {
    let file = File::open(path)
        .with_context(|| format!("[io::geodata] Failed to open geodata file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::geodata] Failed to parse geodata JSON from {:?}", path))
}

/// Join population rows with their geodata, keeping population row order.
/// Every population code must have a geodata entry; extra entries are ignored.
pub fn merge_records(population: Vec<(String, f64)>, geodata: &HashMap<String, DistrictGeodata>) -> Result<Vec<UnitRecord>> {
    population.into_iter()
        .map(|(code, population)| {
            let Some(entry) = geodata.get(&code) else { invalid_input!("no geodata entry for district '{code}'") };
            if entry.neighbour_codes.len() != entry.neighbour_costs.len() {
                invalid_input!("district '{code}' has {} neighbour codes but {} costs",
                    entry.neighbour_codes.len(), entry.neighbour_costs.len())
            }

            let neighbors = entry.neighbour_codes.iter().zip(&entry.neighbour_costs)
                .map(|(code, &cost)| Neighbor { code: code.clone(), cost })
                .collect();
            Ok(UnitRecord { code, population, centroid: entry.centroid, neighbors })
        })
        .collect()
}

/// Read a population CSV and a geodata JSON and merge them into district records.
pub fn load_records(population_csv: &Path, geodata_json: &Path) -> Result<Vec<UnitRecord>> {
    let population = super::read_population_csv(population_csv)?;
    let geodata = read_geodata_json(geodata_json)?;
    merge_records(population, &geodata)
}
