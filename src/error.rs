//! Error types for the Evidentia analysis engine.
//!
//! Only conditions that abort the analysis of a single file surface here.
//! Format-level decode failures are recoverable by design: they are caught
//! at the owning parser boundary and recorded as report warnings, so a
//! broken metadata subsystem never blocks hashing, entropy, or the other
//! metadata groups.

use thiserror::Error;

/// Fatal, per-file error type for Evidentia operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input bytes could not be read at all.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exceeds the configured read ceiling. Hashes and entropy are
    /// defined over the complete byte sequence, so an oversized file is
    /// rejected rather than silently truncated.
    #[error("file size {size} exceeds limit {limit}")]
    FileTooLarge { size: u64, limit: u64 },

    /// Zero-length input: there is nothing to analyze.
    #[error("empty input")]
    EmptyInput,

    /// A caller-imposed per-file deadline expired.
    #[error("analysis timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Result type alias for Evidentia operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
