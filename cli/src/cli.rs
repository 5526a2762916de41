use std::path::PathBuf;

/// Zone design by genetic algorithm
#[derive(clap::Parser, Debug)]
#[command(name = "zonedesign", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the optimizer and write the best zoning
    Design(DesignArgs),

    /// Load and validate inputs, then print a summary
    Check(CheckArgs),
}

/// District data and seed region.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Population table (CSV with CODE and VALUE columns)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub population: PathBuf,

    /// District geodata (JSON keyed by CODE with CENTROID and neighbour lists)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub geodata: PathBuf,

    /// Valid seed region (GeoJSON Polygon, MultiPolygon, Feature or FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub region: PathBuf,
}

/// Optimizer parameters. Flags override values from the config file.
#[derive(clap::Args, Debug)]
pub struct TuningArgs {
    /// JSON configuration file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Number of zones
    #[arg(short, long)]
    pub zones: Option<usize>,

    /// GA population size (even)
    #[arg(short, long)]
    pub population_size: Option<usize>,

    /// Maximum number of generations
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Stop after this many generations without improvement
    #[arg(long)]
    pub no_improvement: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Wall-clock limit in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct DesignArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Output CODE,ZONE assignment file, defaults to "./zones.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Write a JSON run report here
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    /// Directory for intermediate best-partition snapshots
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub snapshots: Option<PathBuf>,

    /// File name prefix for snapshots
    #[arg(long, default_value = "zones")]
    pub prefix: String,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,
}
