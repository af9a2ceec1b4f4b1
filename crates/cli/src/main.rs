//! Seismic Feature Pipeline - Main Entry Point

use clap::Parser;
use seismic_cli::{init_logging, run, Cli};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(&config.log_level, cli.log_json)?;

    info!("=== Seismic Features v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Basis {} at {} levels, data from {}",
        config.extraction.basis,
        config.extraction.levels,
        config.data_dir.display()
    );

    run(&cli, &config)
}
