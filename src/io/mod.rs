//! File formats around the optimizer: population tables, geodata, seed
//! regions, and run outputs.

mod csv;
mod geodata;
mod geojson;
mod report;

pub use csv::{CODE_COLUMN, VALUE_COLUMN, ZONE_COLUMN, read_population_csv, write_assignments_csv};
pub use geodata::{DistrictGeodata, load_records, merge_records, read_geodata_json};
pub use geojson::{parse_region, read_region_geojson};
pub use report::{read_report_json, write_report_json};
