#![doc = "Zone design by genetic algorithm: group districts into population-balanced, contiguous zones."]
mod config;
mod designer;
mod error;
mod graph;
mod io;
mod map;
mod partition;
mod zone;

#[cfg(test)]
mod testing;

pub use geo;

#[doc(inline)]
pub use config::DesignerConfig;

#[doc(inline)]
pub use error::DesignError;

#[doc(inline)]
pub use map::{Neighbor, SeedRegion, SpatialUnit, UnitRecord, UnitTable};

#[doc(inline)]
pub use zone::{DistrictEntry, MAX_CONNECTIVITY_COST, Zone};

#[doc(inline)]
pub use partition::{
    Deviation, Fitness, MAX_SAMPLING_ATTEMPTS, PARALLEL_DECODE_THRESHOLD, Partition, PartitionSnapshot,
    ZoneSnapshot, ZoningProblem,
};

#[doc(inline)]
pub use designer::{CancelToken, DesignReport, DesignerState, GenerationReport, PartitionDesigner, Termination};

#[doc(inline)]
pub use io::{
    CODE_COLUMN, DistrictGeodata, VALUE_COLUMN, ZONE_COLUMN, load_records, merge_records, parse_region,
    read_geodata_json, read_population_csv, read_region_geojson, read_report_json, write_assignments_csv,
    write_report_json,
};
