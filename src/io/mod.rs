//! Bounded input reading for the path-based entry point.
//!
//! Analysis itself is purely in-memory over one immutable buffer; the only
//! I/O the engine performs is the single up-front read here. The size check
//! happens before the read so an oversized file is rejected outright —
//! hashes and entropy cover the complete byte sequence or not at all.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Resource limits for the initial file read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoLimits {
    /// Hard ceiling on the size of a file accepted for analysis.
    pub max_file_size: u64,
}

impl Default for IoLimits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Read a whole file into memory, enforcing the configured size ceiling.
pub fn read_file_bounded<P: AsRef<Path>>(path: P, limits: &IoLimits) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    debug!(path = %path.display(), size_bytes = size, "reading input file");

    if size > limits.max_file_size {
        return Err(AnalysisError::FileTooLarge {
            size,
            limit: limits.max_file_size,
        });
    }
    if size == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    let mut buf = Vec::with_capacity(size as usize);
    let mut reader = file.take(limits.max_file_size);
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}
