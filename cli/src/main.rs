mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{check, design};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber. `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Design(args) => design::run(&cli, args),
        Commands::Check(args) => check::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
