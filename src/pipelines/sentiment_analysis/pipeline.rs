use tokenizers::Tokenizer;

use super::model::SentimentAnalysisModel;

/// Label predicted by the model and the probability it assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentResult {
    pub label: String,
    pub score: f32,
}

/// A ready-to-use pipeline for sentiment analysis.
///
/// Created with [`super::SentimentAnalysisPipelineBuilder`].
pub struct SentimentAnalysisPipeline<M: SentimentAnalysisModel> {
    pub(crate) model: M,
    pub(crate) tokenizer: Tokenizer,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipeline<M> {
    /// Predict the sentiment label of `text` together with its confidence score.
    pub fn predict(&self, text: &str) -> anyhow::Result<SentimentResult> {
        self.model.predict(&self.tokenizer, text)
    }

    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}
