//! ModernBERT sentiment classifier.
//!
//! The network itself comes from `candle-transformers`; this module handles
//! fetching the checkpoint, wiring the label map and turning the class
//! distribution into a [`SentimentResult`].

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Error as E, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::modernbert::{
    ClassifierConfig, ClassifierPooling, Config, ModernBertForSequenceClassification,
};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::core::{ModelOptions, ParseModelSizeError};
use crate::loaders::{LabelMapLoader, TokenizerLoader, WeightsLoader};
use crate::pipelines::sentiment_analysis::{SentimentAnalysisModel, SentimentResult};

/// Available ModernBERT sentiment model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModernBertSize {
    Base,
    Large,
}

impl ModernBertSize {
    /// Hugging Face repository holding the fine-tuned sentiment checkpoint.
    pub fn repo_id(&self) -> &'static str {
        match self {
            ModernBertSize::Base => "clapAI/modernBERT-base-multilingual-sentiment",
            ModernBertSize::Large => "clapAI/modernBERT-large-multilingual-sentiment",
        }
    }
}

impl std::fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModernBertSize::Base => "base",
            ModernBertSize::Large => "large",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ModernBertSize {
    type Err = ParseModelSizeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(ModernBertSize::Base),
            "large" => Ok(ModernBertSize::Large),
            other => Err(ParseModelSizeError(other.to_string())),
        }
    }
}

impl ModelOptions for ModernBertSize {
    fn cache_key(&self) -> String {
        format!("modernbert-{self}-sentiment")
    }
}

/// Sentiment analysis model using ModernBERT.
#[derive(Clone)]
pub struct SentimentModernBertModel {
    model: Arc<ModernBertForSequenceClassification>,
    device: Device,
    id2label: HashMap<usize, String>,
}

impl SentimentModernBertModel {
    pub fn new(size: ModernBertSize, device: Device) -> Result<Self> {
        let repo_id = size.repo_id();

        let (config_content, id2label) = LabelMapLoader::new(repo_id, "config.json").load()?;
        let config = classifier_config(&config_content, &id2label)?;

        let weights_filename = WeightsLoader::new(repo_id).load()?;

        let dtype = DType::F32;
        let vb = if weights_filename
            .extension()
            .is_some_and(|ext| ext == "safetensors")
        {
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_filename], dtype, &device)? }
        } else if weights_filename.extension().is_some_and(|ext| ext == "bin") {
            VarBuilder::from_pth(&weights_filename, dtype, &device)?
        } else {
            anyhow::bail!("Unsupported weight file format: {:?}", weights_filename);
        };

        let model = ModernBertForSequenceClassification::load(vb, &config)?;
        tracing::info!(repo = repo_id, labels = id2label.len(), device = ?device.location(), "sentiment model loaded");

        Ok(Self {
            model: Arc::new(model),
            device,
            id2label,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn predict(&self, tokenizer: &Tokenizer, text: &str) -> Result<SentimentResult> {
        let tokens = tokenizer
            .encode(text, true)
            .map_err(|e| E::msg(format!("Tokenization error: {e}")))?;
        let token_ids = tokens.get_ids();
        let attention_mask_vals = tokens.get_attention_mask();

        let input_ids_tensor = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        let attention_mask_tensor =
            Tensor::new(attention_mask_vals, &self.device)?.unsqueeze(0)?;

        // (1, num_labels) class probabilities
        let probabilities = self
            .model
            .forward(&input_ids_tensor, &attention_mask_tensor)?
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;

        let (class_id, score) = top_class(&probabilities)
            .ok_or_else(|| E::msg("Classifier returned no class probabilities"))?;
        let label = self
            .id2label
            .get(&class_id)
            .ok_or_else(|| {
                E::msg(format!(
                    "Predicted ID '{class_id}' not found in id2label map"
                ))
            })?
            .clone();

        tracing::debug!(%label, score, "classified review");
        Ok(SentimentResult { label, score })
    }

    pub fn get_tokenizer(size: ModernBertSize) -> Result<Tokenizer> {
        TokenizerLoader::new(size.repo_id(), "tokenizer.json").load()
    }
}

#[derive(Deserialize)]
struct RawPooling {
    classifier_pooling: Option<ClassifierPooling>,
}

/// Parses `config.json` and attaches the classification head metadata.
///
/// Hub configs store `label2id` values as integers, which the flattened
/// classifier section cannot read, so the section is rebuilt from `id2label`.
pub(crate) fn classifier_config(
    content: &str,
    id2label: &HashMap<usize, String>,
) -> Result<Config> {
    let mut config: Config = serde_json::from_str(content)
        .map_err(|e| E::msg(format!("Failed to parse model config: {e}")))?;
    if id2label.is_empty() {
        anyhow::bail!("Model config has an empty id2label map");
    }

    let pooling: RawPooling = serde_json::from_str(content)
        .map_err(|e| E::msg(format!("Failed to parse classifier pooling: {e}")))?;

    let id2label: HashMap<String, String> = id2label
        .iter()
        .map(|(id, label)| (id.to_string(), label.clone()))
        .collect();
    let label2id = id2label
        .iter()
        .map(|(id, label)| (label.clone(), id.clone()))
        .collect();

    config.classifier_config = Some(ClassifierConfig {
        id2label,
        label2id,
        classifier_pooling: pooling.classifier_pooling.unwrap_or_default(),
    });
    Ok(config)
}

/// Index and probability of the most likely class.
fn top_class(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
}

impl SentimentAnalysisModel for SentimentModernBertModel {
    type Options = ModernBertSize;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        SentimentModernBertModel::new(options, device)
    }

    fn predict(&self, tokenizer: &Tokenizer, text: &str) -> Result<SentimentResult> {
        self.predict(tokenizer, text)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        SentimentModernBertModel::get_tokenizer(options)
    }

    fn device(&self) -> &Device {
        self.device()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUB_CONFIG: &str = r#"{
        "architectures": ["ModernBertForSequenceClassification"],
        "vocab_size": 50368,
        "hidden_size": 768,
        "num_hidden_layers": 22,
        "num_attention_heads": 12,
        "intermediate_size": 1152,
        "max_position_embeddings": 8192,
        "layer_norm_eps": 1e-05,
        "pad_token_id": 50283,
        "global_attn_every_n_layers": 3,
        "global_rope_theta": 160000.0,
        "local_attention": 128,
        "local_rope_theta": 10000.0,
        "classifier_pooling": "POOLING",
        "id2label": {"0": "negative", "1": "neutral", "2": "positive"},
        "label2id": {"negative": 0, "neutral": 1, "positive": 2}
    }"#;

    fn hub_labels() -> HashMap<usize, String> {
        crate::loaders::parse_label_map(HUB_CONFIG).unwrap()
    }

    #[test]
    fn classifier_config_survives_integer_label2id() {
        let content = HUB_CONFIG.replace("POOLING", "mean");
        let config = classifier_config(&content, &hub_labels()).unwrap();

        let classifier = config.classifier_config.expect("classifier section");
        assert_eq!(classifier.id2label.len(), 3);
        assert_eq!(classifier.id2label["2"], "positive");
        assert_eq!(classifier.label2id["negative"], "0");
        assert_eq!(classifier.classifier_pooling, ClassifierPooling::MEAN);
    }

    #[test]
    fn classifier_pooling_defaults_to_cls() {
        let content = HUB_CONFIG.replace("\"classifier_pooling\": \"POOLING\",", "");
        let config = classifier_config(&content, &hub_labels()).unwrap();

        let classifier = config.classifier_config.expect("classifier section");
        assert_eq!(classifier.classifier_pooling, ClassifierPooling::CLS);
    }

    #[test]
    fn classifier_config_rejects_missing_labels() {
        let content = HUB_CONFIG.replace("POOLING", "mean");
        assert!(classifier_config(&content, &HashMap::new()).is_err());
    }

    #[test]
    fn top_class_picks_highest_probability() {
        assert_eq!(top_class(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
        assert_eq!(top_class(&[]), None);
    }

    #[test]
    fn size_parses_case_insensitively() {
        assert_eq!("Base".parse::<ModernBertSize>().unwrap(), ModernBertSize::Base);
        assert_eq!(" large ".parse::<ModernBertSize>().unwrap(), ModernBertSize::Large);
        assert!("xl".parse::<ModernBertSize>().is_err());
    }

    #[test]
    fn sizes_map_to_distinct_repos() {
        assert_ne!(ModernBertSize::Base.repo_id(), ModernBertSize::Large.repo_id());
        assert!(ModernBertSize::Large.repo_id().contains("large"));
    }

    #[test]
    #[ignore = "downloads the ModernBERT sentiment checkpoint"]
    fn predicts_probability_in_unit_interval() -> anyhow::Result<()> {
        let model = SentimentModernBertModel::new(ModernBertSize::Base, Device::Cpu)?;
        let tokenizer = SentimentModernBertModel::get_tokenizer(ModernBertSize::Base)?;
        let result = model.predict(&tokenizer, "I love this product!")?;
        assert!(result.score > 0.0 && result.score <= 1.0);
        assert!(!result.label.is_empty());
        Ok(())
    }
}
