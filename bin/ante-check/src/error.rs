use std::path::PathBuf;

use hybrid_ante::AnteError;

/// Errors that keep a fixture from being replayed.
///
/// A transaction rejected by the pipeline is not one of them: the rejection is reported in the
/// [`crate::Outcome`].
#[derive(Debug, thiserror::Error)]
pub enum AnteCheckError {
    /// Failed to read the fixture
    #[error("Failed to read {path}: {source}")]
    FileRead {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Failed to create the log file
    #[error("Failed to create log file {path}: {source}")]
    LogFile {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Malformed JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON describing something that cannot be replayed
    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    /// Building the transaction failed before the pipeline ran
    #[error("Ante error: {0}")]
    Ante(#[from] AnteError),
}

/// Result type of the ante-check tool.
pub type Result<T> = std::result::Result<T, AnteCheckError>;
