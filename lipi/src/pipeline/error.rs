//! Pipeline errors.
use std::io::Error;

use crate::transliterate::TransliterationError;

/// Errors that stop a pipeline run. Names that cannot be classified are not
/// errors; they come out with empty columns.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Error opening or creating a file
    #[error("I/O error on '{0}'")]
    Io(String, #[source] Error),

    /// Malformed input table, or a failed write
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// The input header has no name column
    #[error("Column '{0}' not found in input header")]
    MissingColumn(String),

    #[error("Transliteration failed")]
    Transliteration(#[from] TransliterationError),

    /// Error parsing a JSON configuration file
    #[error("Invalid configuration")]
    Config(#[source] serde_json::Error),
}
