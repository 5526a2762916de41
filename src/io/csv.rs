//! CSV reading and writing.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{
    frame::DataFrame,
    io::{SerReader, SerWriter},
    prelude::{CsvReadOptions, CsvWriter, DataType, NamedFrom},
    series::Series,
};

use crate::error::invalid_input;

pub const CODE_COLUMN: &str = "CODE";
pub const VALUE_COLUMN: &str = "VALUE";
pub const ZONE_COLUMN: &str = "ZONE";

/// Read a CSV file with every column as a string, so codes keep leading zeros.
pub(crate) fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Read the district population table: one row per district, `CODE` and `VALUE` columns.
pub fn read_population_csv(path: &Path) -> Result<Vec<(String, f64)>> {
    let df = read_csv_as_strings(path)?;
    population_from_frame(&df)
        .with_context(|| format!("[io::csv::read] Invalid population table {}", path.display()))
}

fn population_from_frame(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    for name in [CODE_COLUMN, VALUE_COLUMN] {
        if df.column(name).is_err() { invalid_input!("population table has no '{name}' column") }
    }

    let codes = df.column(CODE_COLUMN)?.cast(&DataType::String)?;
    let values = df.column(VALUE_COLUMN)?.cast(&DataType::Float64)?;

    codes.str()?.into_iter()
        .zip(values.f64()?.into_iter())
        .enumerate()
        .map(|(row, (code, value))| {
            let Some(code) = code else { invalid_input!("population table row {row} has no code") };
            let Some(value) = value else { invalid_input!("population table row {row} ('{code}') has no numeric value") };
            Ok((code.trim().to_string(), value))
        })
        .collect()
}

/// Build the `CODE,ZONE` frame for a district assignment.
pub(crate) fn assignments_frame(assignments: &[(String, usize)]) -> Result<DataFrame> {
    let (codes, zones) = assignments.iter()
        .map(|(code, zone)| (code.as_str(), *zone as u32))
        .unzip::<_, _, Vec<_>, Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new(CODE_COLUMN.into(), codes).into(),
        Series::new(ZONE_COLUMN.into(), zones).into(),
    ])?)
}

/// Write a district assignment as `CODE,ZONE` rows, in the given order.
pub fn write_assignments_csv(assignments: &[(String, usize)], path: &Path) -> Result<()> {
    let mut df = assignments_frame(assignments)?;
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}
