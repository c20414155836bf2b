// Integration tests for the ModernBERT sentiment pipeline.
// These download model weights from the Hugging Face Hub, so they are ignored
// by default. Run with `cargo test -- --ignored`.

use review_analyzer::core::global_cache;
use review_analyzer::pipelines::review_analysis::ReviewAnalyzer;
use review_analyzer::pipelines::sentiment_analysis::*;

#[test]
#[ignore = "downloads the ModernBERT sentiment checkpoint"]
fn basic_sentiment() -> anyhow::Result<()> {
    let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
        .cpu()
        .build()?;
    let res = pipeline.predict("I love Rust!")?;
    assert!(!res.label.trim().is_empty());
    assert!(res.score > 0.0 && res.score <= 1.0);
    assert!(pipeline.device().is_cpu());
    Ok(())
}

#[test]
#[ignore = "downloads the ModernBERT sentiment checkpoint"]
fn model_is_loaded_once_per_process() -> anyhow::Result<()> {
    let first = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
        .cpu()
        .build()?;
    let cached = global_cache().len();
    let _second = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
        .cpu()
        .build()?;
    assert_eq!(global_cache().len(), cached);

    let analyzer = ReviewAnalyzer::new(first);
    let result = analyzer.analyze("The courier arrived late and the box was broken")?;
    assert_eq!(result.topics, "Quality, Delivery");
    assert!(result.score() <= 0.99);
    Ok(())
}
