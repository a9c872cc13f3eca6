//! Shared reqwest plumbing: client construction and error mapping

use std::time::Duration;

use core_kernel::PortError;

/// Header carrying `OperationMetadata::correlation_id`
pub const CORRELATION_HEADER: &str = "x-correlation-id";

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, PortError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("health-quote/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PortError::Internal {
            message: "Failed to build HTTP client".to_string(),
            source: Some(Box::new(e)),
        })
}

/// Maps a failed send or body read onto a `PortError`
pub(crate) fn map_request_error(error: reqwest::Error, operation: &str, timeout: Duration) -> PortError {
    if error.is_timeout() {
        return PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout.as_millis() as u64,
        };
    }
    if error.is_decode() {
        return PortError::Transformation {
            message: error.to_string(),
        };
    }

    PortError::Connection {
        message: format!("{} failed: {}", operation, error),
        source: Some(Box::new(error)),
    }
}

/// Whether a failure says something about the remote's availability
///
/// 4xx answers are the remote working as intended and do not trip the breaker.
pub(crate) fn counts_against_breaker(error: &PortError) -> bool {
    error.is_transient()
}
