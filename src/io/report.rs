//! JSON run reports.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use crate::designer::DesignReport;

/// Write a run report as pretty-printed JSON.
pub fn write_report_json(report: &DesignReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::report] Failed to create report file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("[io::report] Failed to write report to {:?}", path))?;
    writer.flush()
        .with_context(|| format!("[io::report] Failed to flush report to {:?}", path))
}

/// Read a run report written by `write_report_json`.
pub fn read_report_json(path: &Path) -> Result<DesignReport> {
    let file = File::open(path)
        .with_context(|| format!("[io::report] Failed to open report file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::report] Failed to parse report from {:?}", path))
}
