pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;

pub use crate::core::{AnalysisError, AnalyzerConfig};

pub use models::{ModernBertSize, SentimentModernBertModel};

pub use pipelines::review_analysis::{
    AnalysisResult, BatchReport, ReviewAnalyzer, ReviewBatch, SentimentClassifier,
};
pub use pipelines::sentiment_analysis::{
    SentimentAnalysisPipeline, SentimentAnalysisPipelineBuilder, SentimentResult,
};
