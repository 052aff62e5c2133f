//! Error types returned by the public API.

use thiserror::Error;

/// Errors surfaced by index construction, querying, and persistence.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A mutating operation (`add`, `update_avg_field_len`, ...) was called
    /// on an index that was loaded read-only from disk.
    #[error("index is in read-only mode and cannot be modified")]
    ReadOnlyViolation,

    /// The bulk corpus loader failed to read or parse the input archive.
    #[error("failed to load corpus: {0}")]
    CorpusLoadFailure(String),

    /// A posting-list buffer was shorter than the 16-byte minimum a single
    /// encoded posting requires.
    #[error("posting buffer too short: {0} bytes (minimum 16)")]
    DecoderTooShort(usize),

    /// A required key was absent from a CDB file.
    #[error("missing key in {file}: {key}")]
    MissingKey {
        /// Which of the three CDB files was being read.
        file: &'static str,
        /// The key that was not found.
        key: String,
    },

    /// Wraps the underlying I/O error for file-based operations.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An `AnalyzerConfig` JSON manifest failed to parse.
    #[error("failed to parse analyzer config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IndexError>;
