use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::ModernBertSize;
use crate::pipelines::review_analysis::EXPORT_FILE_NAME;
use crate::pipelines::utils::DeviceRequest;

/// Analyzer settings read from an optional TOML file.
///
/// Every section is optional; missing values fall back to the defaults the
/// command line uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub model: ModelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub size: ModernBertSize,
    pub device: DeviceSetting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

/// Where inference should run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSetting {
    /// CUDA device 0 when available, otherwise CPU.
    #[default]
    Auto,
    Cpu,
    Cuda(usize),
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            size: ModernBertSize::Base,
            device: DeviceSetting::Auto,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(EXPORT_FILE_NAME),
        }
    }
}

impl From<DeviceSetting> for DeviceRequest {
    fn from(setting: DeviceSetting) -> Self {
        match setting {
            DeviceSetting::Auto => DeviceRequest::Default,
            DeviceSetting::Cpu => DeviceRequest::Cpu,
            DeviceSetting::Cuda(index) => DeviceRequest::Cuda(index),
        }
    }
}

impl AnalyzerConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid analyzer config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to load config {}", path.display()))
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize analyzer config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AnalyzerConfig::parse("").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.output.path, PathBuf::from("review_analysis_results.csv"));
        assert_eq!(config.model.device, DeviceSetting::Auto);
    }

    #[test]
    fn parses_all_sections() {
        let config = AnalyzerConfig::parse(
            r#"
            [model]
            size = "large"
            device = { cuda = 1 }

            [output]
            path = "out/results.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.size, ModernBertSize::Large);
        assert_eq!(config.model.device, DeviceSetting::Cuda(1));
        assert_eq!(config.output.path, PathBuf::from("out/results.csv"));
    }

    #[test]
    fn cpu_device_maps_to_cpu_request() {
        let config = AnalyzerConfig::parse("[model]\ndevice = \"cpu\"\n").unwrap();
        assert!(matches!(
            DeviceRequest::from(config.model.device),
            DeviceRequest::Cpu
        ));
    }

    #[test]
    fn rejects_unknown_size() {
        assert!(AnalyzerConfig::parse("[model]\nsize = \"huge\"\n").is_err());
    }

    #[test]
    fn load_reads_file_and_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nsize = \"large\"").unwrap();

        let config = AnalyzerConfig::load(file.path()).unwrap();
        assert_eq!(config.model.size, ModernBertSize::Large);

        let reparsed = AnalyzerConfig::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AnalyzerConfig::load_or_default(Some(Path::new("/nonexistent/analyzer.toml")));
        assert!(err.is_err());
    }
}
