//! Configuration for the analysis pipeline.
//!
//! Tunables only: fixed design constants (the high-entropy threshold, the
//! printable byte classes) are deliberately not configurable so that two
//! runs over the same evidence cannot be made to disagree by configuration.

use crate::io::IoLimits;
use serde::{Deserialize, Serialize};

/// Master configuration for a file analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// String extraction configuration.
    pub strings: StringsConfig,
    /// I/O limits for the path-based entry point.
    pub io: IoLimits,
}

/// String extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringsConfig {
    /// Minimum run length for an extracted printable string.
    pub min_length: usize,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self { min_length: 4 }
    }
}
