//! Test-report error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating a test report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The results document does not exist.
    #[error("Test results file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The results document is not valid.
    #[error("Could not parse test results: {0}")]
    ParseFailure(String),

    /// Reading the input or writing a report failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseFailure(err.to_string())
    }
}
