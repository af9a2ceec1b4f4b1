//! Validation Report CSV

use crate::StorageError;
use data_validator::ValidationReport;
use std::path::Path;
use tracing::info;

const REPORT_HEADER: [&str; 6] = [
    "File ID",
    "Is Valid",
    "Signal Duration (s)",
    "P Arrival Time (s)",
    "Error",
    "Has P Arrival",
];

/// Write a validation report, optionally keeping only invalid entries
///
/// Returns the number of rows written.
pub fn write_validation_report(
    path: &Path,
    report: &ValidationReport,
    only_invalid: bool,
) -> Result<usize, StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut written = 0;

    for entry in report.entries.iter().filter(|e| !only_invalid || !e.is_valid) {
        writer.serialize(entry)?;
        written += 1;
    }
    if written == 0 {
        writer.write_record(REPORT_HEADER)?;
    }
    writer.flush()?;

    info!(
        "Wrote {} validation entries ({} valid of {}) to {}",
        written,
        report.valid_count(),
        report.entries.len(),
        path.display()
    );
    Ok(written)
}
