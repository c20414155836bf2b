use thiserror::Error;

/// Errors surfaced to the user while analyzing reviews.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The batch header has no column literally named `review`.
    #[error("CSV file must have a 'review' column.")]
    MissingReviewColumn,

    /// The batch has no header row at all.
    #[error("Error processing CSV file: No columns to parse from file")]
    NoColumns,

    /// The batch could not be parsed as CSV. Aborts the whole batch.
    #[error("Error processing CSV file: {0}")]
    Csv(#[from] csv::Error),

    /// The batch file could not be read.
    #[error("Error processing CSV file: {0}")]
    Io(#[from] std::io::Error),

    /// The sentiment model failed on a review.
    #[error("sentiment classification failed: {0}")]
    Classifier(String),

    /// The results could not be written out.
    #[error("failed to export analysis results: {0}")]
    Export(String),
}

/// Returned when a model size name is not recognized.
#[derive(Debug, Error)]
#[error("unknown model size '{0}', expected 'base' or 'large'")]
pub struct ParseModelSizeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_message_is_actionable() {
        assert_eq!(
            AnalysisError::MissingReviewColumn.to_string(),
            "CSV file must have a 'review' column."
        );
    }

    #[test]
    fn empty_input_uses_generic_prefix() {
        assert_eq!(
            AnalysisError::NoColumns.to_string(),
            "Error processing CSV file: No columns to parse from file"
        );
    }

    #[test]
    fn io_error_keeps_underlying_text() {
        let err: AnalysisError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into();
        assert_eq!(err.to_string(), "Error processing CSV file: no such file");
    }
}
