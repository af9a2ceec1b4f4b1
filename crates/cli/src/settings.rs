//! Pipeline Configuration
//!
//! Layered as built-in defaults, then an optional TOML file, then
//! `SEISMIC_`-prefixed environment variables (`__` between nested keys).

use config::{Config, ConfigError, Environment, File};
use data_validator::ValidationConfig;
use dataset::BuildConfig;
use feature_engine::SUPPORTED_BASES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storage::LabelTableConfig;
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "seismic-features.toml";

/// Wavelet extraction settings, fixed for a whole build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub basis: String,
    pub levels: usize,
    /// Basis names this deployment accepts
    pub allowed_bases: Vec<String>,
    /// Signals with fewer samples are skipped
    pub min_signal_len: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            basis: "db4".to_string(),
            levels: 4,
            allowed_bases: SUPPORTED_BASES.iter().map(|s| s.to_string()).collect(),
            min_signal_len: 1,
        }
    }
}

impl ExtractionSettings {
    /// Per-signal validation derived from these settings
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            min_samples: self.min_signal_len,
            ..Default::default()
        }
    }

    /// Builder configuration derived from these settings
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            basis: self.basis.clone(),
            levels: self.levels,
            allowed_bases: self.allowed_bases.clone(),
            validation: self.validation(),
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extraction: ExtractionSettings,
    pub labels: LabelTableConfig,
    /// Directory holding waveform documents
    pub data_dir: PathBuf,
    /// Directory receiving dataset files
    pub output_dir: PathBuf,
    /// Base name of the dataset files
    pub dataset_name: String,
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionSettings::default(),
            labels: LabelTableConfig::default(),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("datasets"),
            dataset_name: "train_dataset".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Load the layered configuration
///
/// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is read
/// when present.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let settings = Config::builder()
        .add_source(Config::try_from(&PipelineConfig::default())?)
        .add_source(file)
        .add_source(
            Environment::with_prefix("SEISMIC")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("extraction.allowed_bases")
                .try_parsing(true),
        )
        .build()?;

    let config: PipelineConfig = settings.try_deserialize()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use storage::TimeBasis;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.extraction.basis, "db4");
        assert_eq!(config.extraction.levels, 4);
        assert_eq!(config.labels.time_basis, TimeBasis::Relative);

        let build = config.extraction.build_config();
        assert_eq!(build.allowed_bases.len(), SUPPORTED_BASES.len());
        assert_eq!(build.validation.min_samples, 1);
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(
            &path,
            r#"
dataset_name = "test_dataset"

[extraction]
basis = "sym4"
levels = 3

[labels]
id_column = "archivo"
time_column = "lec_p"
time_basis = "absolute"
id_pad_width = 8
id_extension = ".mseed"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.dataset_name, "test_dataset");
        assert_eq!(config.extraction.basis, "sym4");
        assert_eq!(config.extraction.levels, 3);
        assert_eq!(config.extraction.min_signal_len, 1);
        assert_eq!(config.labels.time_basis, TimeBasis::Absolute);
        assert_eq!(config.labels.id_pad_width, Some(8));
        assert_eq!(config.output_dir, PathBuf::from("datasets"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
