//! Seismic Feature Pipeline
//!
//! Command-line front end: configuration, logging, and the `build`,
//! `relabel`, `audit` and `validate` subcommands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use storage::LabelTableConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod commands;
mod settings;

pub use settings::{load_config, ExtractionSettings, PipelineConfig, DEFAULT_CONFIG_FILE};

/// Wavelet feature extraction for labeled seismic recordings
#[derive(Parser, Debug)]
#[command(name = "seismic-features", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "SEISMIC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding waveform documents
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Label table uses the raw catalogue layout (numeric ids, epoch times)
    #[arg(long, global = true)]
    pub raw_catalogue: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract features and save a dataset
    Build {
        /// Label table CSV
        labels: PathBuf,
        /// Analyzing wavelet
        #[arg(long)]
        basis: Option<String>,
        /// Decomposition depth
        #[arg(long)]
        levels: Option<usize>,
        /// Dataset base name
        #[arg(long)]
        name: Option<String>,
        /// Output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Rewrite arrival times relative to each recording start
    Relabel {
        /// Label table CSV
        labels: PathBuf,
        /// Output CSV (`file,arrival_time`)
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Report sampling rates and signal lengths
    Audit {
        /// Label table CSV
        labels: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Check each record's signal and arrival time
    Validate {
        /// Label table CSV
        labels: PathBuf,
        /// Report CSV
        #[arg(long, short)]
        out: PathBuf,
        /// Only write invalid records
        #[arg(long)]
        only_invalid: bool,
    },
}

impl Cli {
    /// Load the layered configuration and apply command-line overrides
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = load_config(self.config.as_deref()).context("Failed to load configuration")?;

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.raw_catalogue {
            config.labels = LabelTableConfig::raw_catalogue();
        }

        if let Command::Build {
            basis,
            levels,
            name,
            output_dir,
            ..
        } = &self.command
        {
            if let Some(basis) = basis {
                config.extraction.basis = basis.clone();
            }
            if let Some(levels) = levels {
                config.extraction.levels = *levels;
            }
            if let Some(name) = name {
                config.dataset_name = name.clone();
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir.clone();
            }
        }

        Ok(config)
    }
}

/// Initialize logging
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let level = Level::from_str(level).with_context(|| format!("Invalid log level '{level}'"))?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}

/// Run one subcommand
pub fn run(cli: &Cli, config: &PipelineConfig) -> Result<()> {
    match &cli.command {
        Command::Build { labels, .. } => {
            let (saved, summary) = commands::build(config, labels)?;
            info!(
                "Wrote {}, {}, {}, {}",
                saved.features_csv.display(),
                saved.labels_csv.display(),
                saved.snapshot.display(),
                saved.summary_json.display()
            );
            if summary.no_usable_data() {
                anyhow::bail!("No usable records: all {} records were skipped", summary.attempted);
            }
        }
        Command::Relabel { labels, out } => {
            commands::relabel(config, labels, out)?;
        }
        Command::Audit { labels, out } => {
            commands::audit(config, labels, out.as_deref())?;
        }
        Command::Validate {
            labels,
            out,
            only_invalid,
        } => {
            commands::validate(config, labels, out, *only_invalid)?;
        }
    }
    Ok(())
}
