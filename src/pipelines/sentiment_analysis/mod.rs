//! Sentiment analysis pipeline for classifying the emotional tone of text.
//!
//! ## Main Types
//!
//! - [`SentimentAnalysisPipeline`] - High-level interface for sentiment classification
//! - [`SentimentAnalysisPipelineBuilder`] - Builder pattern for pipeline configuration
//! - [`SentimentAnalysisModel`] - Trait for sentiment analysis model implementations
//! - [`SentimentResult`] - Predicted label with its probability
//! - [`ModernBertSize`] - Available model size options
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use review_analyzer::pipelines::sentiment_analysis::*;
//!
//! # fn run() -> anyhow::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
//!     .cpu()
//!     .build()?;
//!
//! let result = pipeline.predict("I love this product!")?;
//! println!("Sentiment: {} (confidence: {:.2})", result.label, result.score);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod model;
pub mod pipeline;

pub use builder::SentimentAnalysisPipelineBuilder;
pub use model::SentimentAnalysisModel;
pub use pipeline::{SentimentAnalysisPipeline, SentimentResult};

pub use crate::models::ModernBertSize;
