//! Review analysis: sentiment, confidence bucket and keyword topics per review.
//!
//! ## Main Types
//!
//! - [`ReviewAnalyzer`] - Runs a [`SentimentClassifier`] and attaches confidence and topics
//! - [`AnalysisResult`] - Result for a single review
//! - [`ReviewBatch`] / [`BatchReport`] - CSV batch input and its four-column export
//! - [`Confidence`] - Capped score with its High / Medium / Low bucket
//! - [`Topic`] - Price, Quality and Delivery keyword topics
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use review_analyzer::pipelines::review_analysis::*;
//! use review_analyzer::pipelines::sentiment_analysis::*;
//!
//! # fn run() -> anyhow::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
//! let analyzer = ReviewAnalyzer::new(pipeline);
//!
//! let result = analyzer.analyze("Great build quality, very durable")?;
//! println!("{} | {} | {}", result.sentiment, result.confidence, result.topics);
//!
//! let batch = ReviewBatch::from_path("reviews.csv".as_ref())?;
//! analyzer.analyze_batch(&batch)?.save(EXPORT_FILE_NAME.as_ref())?;
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod batch;
pub mod confidence;
pub mod topics;

pub use analyzer::{AnalysisResult, ReviewAnalyzer, SentimentClassifier, SentimentColor};
pub use batch::{
    BatchReport, BatchRow, ReviewBatch, SentimentSummary, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME,
    OUTPUT_HEADERS, REVIEW_COLUMN,
};
pub use confidence::{cap_score, Confidence, ConfidenceLevel};
pub use topics::{detect_topics, topic_tag, Topic, NO_TOPICS};
