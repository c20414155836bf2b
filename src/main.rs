use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::{style, Color, StyledContent, Stylize};
use tracing_subscriber::EnvFilter;

use review_analyzer::pipelines::review_analysis::{
    AnalysisResult, BatchReport, ReviewAnalyzer, ReviewBatch, SentimentColor, SentimentSummary,
    OUTPUT_HEADERS,
};
use review_analyzer::pipelines::sentiment_analysis::SentimentAnalysisPipelineBuilder;
use review_analyzer::pipelines::utils::DeviceRequest;
use review_analyzer::{AnalysisError, AnalyzerConfig, ModernBertSize, SentimentModernBertModel};

const CONFIDENCE_CAPTION: &str =
    "ℹ️ Confidence shows how certain the AI is about the sentiment prediction.";
const EMPTY_INPUT_PROMPT: &str = "Please paste a review or upload a CSV file to analyze.";
const REVIEW_PREVIEW_CHARS: usize = 60;

#[derive(Parser, Debug)]
#[command(
    name = "review-analyzer",
    version,
    about = "Sentiment, confidence and topics (Price, Quality, Delivery) for product reviews"
)]
struct Cli {
    /// TOML file with model and output defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// A single review to analyze
    #[arg(long)]
    text: Option<String>,

    /// CSV file with a 'review' column; takes precedence over --text
    #[arg(long)]
    file: Option<PathBuf>,

    /// Where to write batch results
    #[arg(long)]
    output: Option<PathBuf>,

    /// Model size: base or large
    #[arg(long)]
    size: Option<ModernBertSize>,

    /// Force CPU inference
    #[arg(long, conflicts_with = "cuda")]
    cpu: bool,

    /// Run on the CUDA device with this index
    #[arg(long)]
    cuda: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

type ModernBertAnalyzer =
    ReviewAnalyzer<review_analyzer::SentimentAnalysisPipeline<SentimentModernBertModel>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AnalyzerConfig::load_or_default(cli.config.as_deref())?;
    if let Some(size) = cli.size {
        config.model.size = size;
    }
    if let Some(output) = cli.output {
        config.output.path = output;
    }
    let device = if cli.cpu {
        DeviceRequest::Cpu
    } else if let Some(index) = cli.cuda {
        DeviceRequest::Cuda(index)
    } else {
        config.model.device.into()
    };

    if let Some(file) = cli.file {
        return run_batch(&file, &config, device);
    }

    match cli.text.as_deref() {
        Some(text) if !text.trim().is_empty() => run_single(text, &config, device),
        _ => {
            println!("{EMPTY_INPUT_PROMPT}");
            Ok(())
        }
    }
}

fn load_analyzer(config: &AnalyzerConfig, device: DeviceRequest) -> Result<ModernBertAnalyzer> {
    let pipeline = SentimentAnalysisPipelineBuilder::modernbert(config.model.size)
        .device_request(device)
        .build()
        .with_context(|| format!("failed to load the {} sentiment model", config.model.size))?;
    Ok(ReviewAnalyzer::new(pipeline))
}

fn run_single(text: &str, config: &AnalyzerConfig, device: DeviceRequest) -> Result<()> {
    let analyzer = load_analyzer(config, device)?;
    let result = analyzer.analyze(text)?;
    render_single(&result);
    Ok(())
}

fn run_batch(file: &Path, config: &AnalyzerConfig, device: DeviceRequest) -> Result<()> {
    // Parse before loading the model so a bad file fails fast.
    let batch = ReviewBatch::from_path(file).map_err(batch_failure)?;
    let analyzer = load_analyzer(config, device)?;

    eprintln!("Analyzing {} reviews...", batch.len());
    let report = analyzer.analyze_batch(&batch).map_err(batch_failure)?;
    println!("✅ Analysis complete!");

    render_summary(&report.summary());
    render_table(&report);

    report.save(&config.output.path).map_err(batch_failure)?;
    println!(
        "📥 Analysis results saved to {}",
        config.output.path.display()
    );
    Ok(())
}

/// Errors that already carry a user-facing message are shown as is; anything
/// else gets the generic batch prefix.
fn batch_failure(err: AnalysisError) -> anyhow::Error {
    match err {
        AnalysisError::MissingReviewColumn
        | AnalysisError::NoColumns
        | AnalysisError::Csv(_)
        | AnalysisError::Io(_) => err.into(),
        other => anyhow::anyhow!("Error processing CSV file: {other}"),
    }
}

/// Colors `text` only when it goes to a terminal, so piped output stays plain.
fn paint(text: &str, color: SentimentColor, styled: bool) -> StyledContent<String> {
    if !styled {
        return style(text.to_string());
    }
    let color = match color {
        SentimentColor::Green => Color::Green,
        SentimentColor::Red => Color::Red,
        SentimentColor::Orange => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
    };
    text.to_string().with(color).bold()
}

fn render_single(result: &AnalysisResult) {
    let styled = std::io::stdout().is_terminal();
    println!(
        "Sentiment: {}",
        paint(&result.sentiment, result.sentiment_color(), styled)
    );
    println!("Confidence: {}", result.confidence);
    println!("Topics Discussed: {}", result.topics);
    println!();
    println!("{CONFIDENCE_CAPTION}");
}

fn render_summary(summary: &SentimentSummary) {
    println!();
    println!("Sentiment Summary");
    let styled = std::io::stdout().is_terminal();
    for (label, count) in summary.headline() {
        let line = format!("{}: {count}", title_case(label));
        println!("- {}", paint(&line, SentimentColor::for_label(label), styled));
    }
    println!();
}

fn render_table(report: &BatchReport) {
    let rows: Vec<[String; 4]> = report
        .rows()
        .iter()
        .map(|row| {
            [
                preview(&row.review),
                row.sentiment.clone(),
                row.confidence.clone(),
                row.topics.clone(),
            ]
        })
        .collect();

    let mut widths = OUTPUT_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = OUTPUT_HEADERS.map(String::from);
    println!("{}", format_row(&header, &widths));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn preview(review: &str) -> String {
    let single_line = review.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= REVIEW_PREVIEW_CHARS {
        return single_line;
    }
    let truncated: String = single_line.chars().take(REVIEW_PREVIEW_CHARS - 1).collect();
    format!("{truncated}…")
}

fn title_case(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
