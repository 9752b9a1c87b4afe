//! Error taxonomy for the analysis pipeline.
//!
//! Only failures that stop an analysis are represented here. Python syntax
//! errors become a `critical` finding, and an unsupported extension or a
//! missing model degrade the report instead of failing it.

use std::path::PathBuf;

/// Errors surfaced by the analysis pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The requested source file does not exist.
    #[error("source file not found: {}", path.display())]
    SourceNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The source file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one of the recognised language tags.
    #[error("unsupported language for extension '{extension}'")]
    UnsupportedLanguage {
        /// Extension as found on the path (without the dot).
        extension: String,
    },

    /// No trained classifier could be loaded.
    #[error("no trained model available at {}: {reason}", path.display())]
    ModelUnavailable {
        /// Location of the expected model artifact.
        path: PathBuf,
        /// Human readable cause.
        reason: String,
    },

    /// A model artifact exists but is not valid JSON for the expected schema.
    #[error("invalid model artifact: {0}")]
    ModelFormat(#[from] serde_json::Error),

    /// A training dataset could not be used.
    #[error("invalid dataset: {reason}")]
    Dataset {
        /// Human readable cause.
        reason: String,
    },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
