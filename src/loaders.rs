//! Model and tokenizer loading utilities for Hugging Face Hub integration.
//!
//! ## Main Types
//!
//! - [`HfLoader`] - Generic Hugging Face file loader with retry logic
//! - [`TokenizerLoader`] - Loads tokenizers from Hugging Face repositories
//! - [`WeightsLoader`] - Locates classifier weights (`.safetensors` or `.bin`)
//! - [`LabelMapLoader`] - Reads the `id2label` map from a model's `config.json`
//!
//! All loaders retry on Hugging Face Hub lock acquisition failures, which
//! happen when two processes download the same file at once.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use hf_hub::api::sync::ApiBuilder;
use serde::Deserialize;
use tokenizers::Tokenizer;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    pub fn load(&self) -> anyhow::Result<PathBuf> {
        let hf_api = ApiBuilder::new().with_progress(false).build()?;
        let hf_repo = hf_api.model(self.repo.clone());

        let mut attempt = 0;
        loop {
            match hf_repo.get(self.filename.as_str()) {
                Ok(path) => return Ok(path),
                Err(e) if is_lock_failure(&e.to_string()) && attempt + 1 < MAX_RETRIES => {
                    let wait_time = backoff(attempt);
                    tracing::warn!(
                        repo = %self.repo,
                        file = %self.filename,
                        ?wait_time,
                        "hub lock busy, retrying"
                    );
                    std::thread::sleep(wait_time);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("failed to fetch {} from {}", self.filename, self.repo)
                    })
                }
            }
        }
    }
}

fn is_lock_failure(message: &str) -> bool {
    message.contains("Lock acquisition failed")
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100 * (1 << attempt))
}

#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, filename),
        }
    }

    pub fn load(&self) -> anyhow::Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load()?;

        Tokenizer::from_file(tokenizer_file_path).map_err(anyhow::Error::msg)
    }
}

/// Finds the weight file of a classifier checkpoint, preferring safetensors.
#[derive(Debug, Clone)]
pub struct WeightsLoader {
    pub repo: String,
}

impl WeightsLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    pub fn load(&self) -> anyhow::Result<PathBuf> {
        match HfLoader::new(&self.repo, "model.safetensors").load() {
            Ok(path) => Ok(path),
            Err(safetensors_err) => {
                tracing::debug!(error = %safetensors_err, "no safetensors weights, trying pytorch_model.bin");
                HfLoader::new(&self.repo, "pytorch_model.bin")
                    .load()
                    .map_err(|e| {
                        anyhow::anyhow!(
                            "Model weights not found in repo. Expected `model.safetensors` or `pytorch_model.bin`. Error: {e}"
                        )
                    })
            }
        }
    }
}

#[derive(Deserialize)]
struct RawLabelConfig {
    id2label: HashMap<String, String>,
}

/// Reads the class index to label mapping of a sequence classifier.
#[derive(Debug, Clone)]
pub struct LabelMapLoader {
    pub config_file_loader: HfLoader,
}

impl LabelMapLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            config_file_loader: HfLoader::new(repo, filename),
        }
    }

    /// Returns the raw `config.json` content alongside the parsed label map.
    pub fn load(&self) -> anyhow::Result<(String, HashMap<usize, String>)> {
        let config_path = self.config_file_loader.load()?;
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {config_path:?}"))?;
        let labels = parse_label_map(&content)?;
        Ok((content, labels))
    }
}

pub(crate) fn parse_label_map(content: &str) -> anyhow::Result<HashMap<usize, String>> {
    let raw: RawLabelConfig =
        serde_json::from_str(content).context("Failed to parse classifier config")?;

    raw.id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label))
                .with_context(|| format!("Invalid class id '{id}' in id2label"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_map_with_numeric_keys() {
        let labels = parse_label_map(
            r#"{"hidden_size": 768, "id2label": {"0": "negative", "1": "neutral", "2": "positive"}}"#,
        )
        .unwrap();

        assert_eq!(labels.len(), 3);
        assert_eq!(labels[&0], "negative");
        assert_eq!(labels[&2], "positive");
    }

    #[test]
    fn rejects_config_without_labels() {
        assert!(parse_label_map(r#"{"hidden_size": 768}"#).is_err());
    }

    #[test]
    fn rejects_non_numeric_class_ids() {
        assert!(parse_label_map(r#"{"id2label": {"first": "positive"}}"#).is_err());
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(0), Duration::from_millis(100));
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(400));
    }

    #[test]
    fn detects_lock_failures() {
        assert!(is_lock_failure("Lock acquisition failed: /tmp/.lock"));
        assert!(!is_lock_failure("request error: 404"));
    }
}
