use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::analyzer::{AnalysisResult, ReviewAnalyzer, SentimentClassifier};
use crate::core::AnalysisError;

/// Header of the column holding the review text in batch input.
pub const REVIEW_COLUMN: &str = "review";
/// File name used when exporting batch results.
pub const EXPORT_FILE_NAME: &str = "review_analysis_results.csv";
/// Content type of the exported results.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";
/// Columns of the exported results, in order.
pub const OUTPUT_HEADERS: [&str; 4] = ["review", "Sentiment", "Confidence", "Topics"];

/// Reviews read from the `review` column of a CSV file, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewBatch {
    reviews: Vec<String>,
}

impl ReviewBatch {
    /// Parses CSV input. Columns other than `review` are ignored.
    ///
    /// Short rows are tolerated and their missing review reads as empty text.
    /// Any parse error aborts the whole batch.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnalysisError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = csv_reader.headers()?;
        if headers.is_empty() {
            return Err(AnalysisError::NoColumns);
        }
        let column = headers
            .iter()
            .position(|header| header == REVIEW_COLUMN)
            .ok_or(AnalysisError::MissingReviewColumn)?;

        let reviews = csv_reader
            .records()
            .map(|record| record.map(|r| r.get(column).unwrap_or_default().to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(rows = reviews.len(), column, "parsed review batch");
        Ok(Self { reviews })
    }

    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reviews<I, S>(reviews: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reviews: reviews.into_iter().map(Into::into).collect(),
        }
    }

    pub fn reviews(&self) -> &[String] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// One row of the exported results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRow {
    #[serde(rename = "review")]
    pub review: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "Confidence")]
    pub confidence: String,
    #[serde(rename = "Topics")]
    pub topics: String,
}

impl From<AnalysisResult> for BatchRow {
    fn from(result: AnalysisResult) -> Self {
        Self {
            confidence: result.confidence.label(),
            review: result.review,
            sentiment: result.sentiment,
            topics: result.topics,
        }
    }
}

/// Results of a batch analysis, one row per input review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    rows: Vec<BatchRow>,
}

impl BatchReport {
    pub fn new(rows: Vec<BatchRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BatchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> SentimentSummary {
        SentimentSummary::from_labels(self.rows.iter().map(|row| row.sentiment.as_str()))
    }

    /// Writes the four result columns as UTF-8 CSV, header included.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AnalysisError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(OUTPUT_HEADERS).map_err(export_error)?;
        for row in &self.rows {
            csv_writer.serialize(row).map_err(export_error)?;
        }
        csv_writer.flush().map_err(export_error)?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, AnalysisError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }

    pub fn save(&self, path: &Path) -> Result<(), AnalysisError> {
        let file = File::create(path).map_err(export_error)?;
        self.write_csv(file)?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "exported analysis results");
        Ok(())
    }

    /// Reads back a table produced by [`BatchReport::write_csv`].
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, AnalysisError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize::<BatchRow>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }
}

fn export_error(err: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Export(err.to_string())
}

/// Number of reviews per sentiment label, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentSummary {
    counts: BTreeMap<String, usize>,
}

impl SentimentSummary {
    /// Labels always listed in the summary, even with a zero count.
    pub const HEADLINE_LABELS: [&'static str; 2] = ["POSITIVE", "NEGATIVE"];

    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = BTreeMap::new();
        for label in labels {
            *counts.entry(label.to_uppercase()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts
            .get(&label.to_uppercase())
            .copied()
            .unwrap_or(0)
    }

    /// Counts for [`Self::HEADLINE_LABELS`], in that order.
    pub fn headline(&self) -> [(&'static str, usize); 2] {
        Self::HEADLINE_LABELS.map(|label| (label, self.count(label)))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl<C: SentimentClassifier> ReviewAnalyzer<C> {
    /// Analyzes every review of `batch` in input order.
    ///
    /// The first failing review aborts the batch.
    pub fn analyze_batch(&self, batch: &ReviewBatch) -> Result<BatchReport, AnalysisError> {
        tracing::info!(reviews = batch.len(), "analyzing batch");

        let rows = batch
            .reviews()
            .iter()
            .map(|review| self.analyze(review).map(BatchRow::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BatchReport::new(rows))
    }
}
