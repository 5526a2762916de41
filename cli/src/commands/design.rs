use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use zonedesign::{CancelToken, GenerationReport, PartitionDesigner, PartitionSnapshot, write_assignments_csv, write_report_json};

use crate::commands::{build_config, load_inputs};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::DesignArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./zones.csv".into());
    let config = build_config(&args.tuning)?;
    let (records, region) = load_inputs(&args.inputs)?;

    let mut designer = PartitionDesigner::new(records, region, config)?;
    let mut snapshots = match &args.snapshots {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("[design] Failed to create snapshot directory {}", dir.display()))?;
            let prefix = format!("{}_nz{}_pc{}", args.prefix, designer.config().num_zones, designer.config().population_cardinality);
            Some(SnapshotWriter::new(dir.clone(), prefix, designer.cancel_token()))
        }
        None => None,
    };

    designer.initialize()?;
    if let Some(writer) = &mut snapshots { writer.write(&designer.best_snapshot()?, 0)? }

    let termination = designer.fit_with(|report: &GenerationReport| {
        if let Some(writer) = &mut snapshots { writer.observe(report) }
    })?;
    if let Some(writer) = &mut snapshots { writer.finish(&designer.best_snapshot()?, designer.iteration())? }
    tracing::info!("run finished: {termination:?}, best score {:.6}", designer.best_score()?);

    let zone_of = designer.district_zones()?;
    let assignments: Vec<(String, usize)> = designer.problem().table().units().iter()
        .map(|unit| (unit.code().to_string(), zone_of[unit.code()]))
        .collect();
    tracing::info!("writing zones to {}", out_path.display());
    write_assignments_csv(&assignments, &out_path)?;

    if let Some(path) = &args.report {
        tracing::info!("writing report to {}", path.display());
        write_report_json(&designer.report()?, path)?;
    }
    Ok(())
}

/// Writes best-partition snapshots as `<prefix>_nz<zones>_pc<population>_it<iteration>.json`.
///
/// The first failed write during the run cancels it; the error is returned by `finish`.
struct SnapshotWriter {
    dir: PathBuf,
    prefix: String,
    cancel: CancelToken,
    last_written: Option<usize>,
    failed: Option<anyhow::Error>,
}

impl SnapshotWriter {
    fn new(dir: PathBuf, prefix: String, cancel: CancelToken) -> Self {
        Self { dir, prefix, cancel, last_written: None, failed: None }
    }

    fn path(&self, iteration: usize) -> PathBuf {
        self.dir.join(format!("{}_it{iteration:05}.json", self.prefix))
    }

    fn write(&mut self, snapshot: &PartitionSnapshot, iteration: usize) -> Result<()> {
        write_json(snapshot, &self.path(iteration))?;
        self.last_written = Some(iteration);
        Ok(())
    }

    /// Write the checkpoint snapshot carried by `report`, if any.
    fn observe(&mut self, report: &GenerationReport) {
        let Some(snapshot) = &report.best_snapshot else { return };
        if self.failed.is_some() { return }
        if let Err(err) = self.write(snapshot, report.iteration) {
            tracing::warn!("stopping run: {err:#}");
            self.failed = Some(err);
            self.cancel.cancel();
        }
    }

    /// Surface a failure from the run, then write the final snapshot unless
    /// that iteration is already on disk.
    fn finish(&mut self, snapshot: &PartitionSnapshot, iteration: usize) -> Result<()> {
        if let Some(err) = self.failed.take() { return Err(err) }
        if self.last_written == Some(iteration) { return Ok(()) }
        self.write(snapshot, iteration)
    }
}

fn write_json(snapshot: &PartitionSnapshot, path: &Path) -> Result<()> {
    tracing::debug!("writing snapshot {}", path.display());
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json).with_context(|| format!("[design] Failed to write snapshot {}", path.display()))
}
