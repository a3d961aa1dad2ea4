//! Per-file timeout helper for surrounding systems.
//!
//! The engine itself defines no cancellation primitive — every loop it runs
//! is bounded by the buffer length. A batch runner that wants a per-file
//! deadline wraps the analysis future here; expiry fails that file only and
//! leaves the rest of the batch untouched.

use crate::error::{AnalysisError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error};

/// Default per-file deadline in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Timeout configuration for one analysis operation.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Maximum duration for the operation.
    pub duration: Duration,
    /// Operation name for logging.
    pub operation_name: String,
}

impl TimeoutConfig {
    pub fn new(seconds: u64, operation: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_secs(seconds),
            operation_name: operation.into(),
        }
    }

    pub fn default_timeout(operation: impl Into<String>) -> Self {
        Self::new(DEFAULT_TIMEOUT_SECONDS, operation)
    }
}

/// Execute an async operation with a deadline.
pub async fn with_timeout<T, F>(config: TimeoutConfig, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!(
        "starting '{}' with a {}s deadline",
        config.operation_name,
        config.duration.as_secs()
    );

    match timeout(config.duration, future).await {
        Ok(result) => result,
        Err(_) => {
            error!(
                "'{}' timed out after {}s",
                config.operation_name,
                config.duration.as_secs()
            );
            Err(AnalysisError::Timeout {
                seconds: config.duration.as_secs(),
            })
        }
    }
}
