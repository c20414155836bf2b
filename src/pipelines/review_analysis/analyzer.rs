use super::confidence::Confidence;
use super::topics::topic_tag;
use crate::core::AnalysisError;
use crate::pipelines::sentiment_analysis::{
    SentimentAnalysisModel, SentimentAnalysisPipeline, SentimentResult,
};

/// Anything that can label the sentiment of a piece of text.
pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<SentimentResult>;
}

impl<M: SentimentAnalysisModel> SentimentClassifier for SentimentAnalysisPipeline<M> {
    fn classify(&self, text: &str) -> anyhow::Result<SentimentResult> {
        self.predict(text)
    }
}

impl<C: SentimentClassifier + ?Sized> SentimentClassifier for &C {
    fn classify(&self, text: &str) -> anyhow::Result<SentimentResult> {
        (**self).classify(text)
    }
}

impl<C: SentimentClassifier + ?Sized> SentimentClassifier for Box<C> {
    fn classify(&self, text: &str) -> anyhow::Result<SentimentResult> {
        (**self).classify(text)
    }
}

/// Color a sentiment label is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentColor {
    Green,
    Red,
    Orange,
}

impl SentimentColor {
    /// Green for positive, red for negative and orange for anything else.
    pub fn for_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("positive") {
            SentimentColor::Green
        } else if label.eq_ignore_ascii_case("negative") {
            SentimentColor::Red
        } else {
            SentimentColor::Orange
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentColor::Green => "green",
            SentimentColor::Red => "red",
            SentimentColor::Orange => "orange",
        }
    }
}

/// Sentiment, confidence and topics derived for one review.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub review: String,
    pub sentiment: String,
    pub confidence: Confidence,
    pub topics: String,
}

impl AnalysisResult {
    pub fn score(&self) -> f64 {
        self.confidence.score
    }

    pub fn sentiment_color(&self) -> SentimentColor {
        SentimentColor::for_label(&self.sentiment)
    }
}

/// Combines a sentiment classifier with the topic tagger and confidence buckets.
pub struct ReviewAnalyzer<C> {
    classifier: C,
}

impl<C: SentimentClassifier> ReviewAnalyzer<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Classifies one review and attaches its confidence bucket and topic tag.
    pub fn analyze(&self, review: &str) -> Result<AnalysisResult, AnalysisError> {
        let SentimentResult { label, score } = self
            .classifier
            .classify(review)
            .map_err(|e| AnalysisError::Classifier(format!("{e:#}")))?;

        Ok(AnalysisResult {
            review: review.to_string(),
            sentiment: label,
            confidence: Confidence::from_raw(score),
            topics: topic_tag(review),
        })
    }
}
