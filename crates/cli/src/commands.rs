//! Subcommand Implementations

use crate::PipelineConfig;
use anyhow::{Context, Result};
use data_validator::{
    collect_lengths, LengthStatistics, SamplingRateCensus, SignalValidator, ValidationReport,
};
use dataset::{BuildSummary, DatasetBuilder, LabelResolver, RecordFailure};
use serde::Serialize;
use std::path::Path;
use storage::{
    read_label_table, write_json, write_relative_labels, write_validation_report, DatasetStore,
    SavedDataset,
};
use tracing::{info, warn};
use waveform::{JsonWaveformSource, LabeledRecord};

fn load_records(config: &PipelineConfig, labels: &Path) -> Result<Vec<LabeledRecord>> {
    read_label_table(labels, &config.labels)
        .with_context(|| format!("Failed to read label table {}", labels.display()))
}

fn source(config: &PipelineConfig) -> JsonWaveformSource {
    JsonWaveformSource::new(&config.data_dir)
}

/// Extract features for every labeled record and save the dataset
pub fn build(config: &PipelineConfig, labels: &Path) -> Result<(SavedDataset, BuildSummary)> {
    let records = load_records(config, labels)?;
    let builder = DatasetBuilder::new(config.extraction.build_config())
        .context("Invalid extraction settings")?;

    let output = builder
        .build(&records, &source(config))
        .context("Dataset build did not complete")?;

    let store = DatasetStore::new(&config.output_dir);
    let saved = store
        .save(
            &config.dataset_name,
            &output.dataset,
            &builder.feature_names(),
            &output.summary,
        )
        .with_context(|| format!("Failed to save dataset '{}'", config.dataset_name))?;

    info!(
        "Dataset '{}': {} rows, {} skipped",
        config.dataset_name,
        output.summary.succeeded,
        output.summary.skipped_total()
    );
    Ok((saved, output.summary))
}

/// Convert a label table to arrival times relative to each recording
pub fn relabel(config: &PipelineConfig, labels: &Path, out: &Path) -> Result<Vec<RecordFailure>> {
    let records = load_records(config, labels)?;
    let source = source(config);
    let resolution = LabelResolver::new(&source).resolve(&records);

    write_relative_labels(out, &resolution.labels)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    if !resolution.failures.is_empty() {
        warn!(
            "{} of {} labels could not be resolved",
            resolution.failures.len(),
            records.len()
        );
    }
    Ok(resolution.failures)
}

/// Sampling-rate and length overview of the labeled recordings
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub sampling_rates: SamplingRateCensus,
    pub min_sampling_rate: Option<f64>,
    pub lengths: Option<LengthStatistics>,
    /// `(identifier, error)` for unreadable recordings
    pub unreadable: Vec<(String, String)>,
}

/// Survey sampling rates and signal lengths
pub fn audit(config: &PipelineConfig, labels: &Path, out: Option<&Path>) -> Result<AuditReport> {
    let records = load_records(config, labels)?;
    let source = source(config);
    let ids: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();

    let census = SamplingRateCensus::collect(&ids, &source);
    let (lengths, failures) = collect_lengths(&ids, &source);

    let report = AuditReport {
        min_sampling_rate: census.min_rate(),
        sampling_rates: census,
        lengths: LengthStatistics::from_lengths(&lengths),
        unreadable: failures
            .into_iter()
            .map(|(id, e)| (id, e.to_string()))
            .collect(),
    };

    match out {
        Some(path) => write_json(path, &report)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to render audit report")?
        ),
    }
    Ok(report)
}

/// Validate every labeled record and export the report
pub fn validate(
    config: &PipelineConfig,
    labels: &Path,
    out: &Path,
    only_invalid: bool,
) -> Result<ValidationReport> {
    let records = load_records(config, labels)?;
    let validator = SignalValidator::new(config.extraction.validation());
    let report = ValidationReport::build(&records, &source(config), &validator);

    write_validation_report(out, &report, only_invalid)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    info!(
        "{} of {} records valid",
        report.valid_count(),
        report.entries.len()
    );
    Ok(report)
}
