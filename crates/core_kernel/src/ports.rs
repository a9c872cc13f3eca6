//! Ports and Adapters Infrastructure
//!
//! Foundational types for the hexagonal layout shared by the quote and
//! catalog domains.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │        Wizard controller / session API         │
//! └───────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌───────────────────────────────────────────────┐
//! │   Port traits (QuoteSubmissionPort,            │
//! │   PlanCatalogPort), depend only on core_kernel │
//! └───────────────────────────────────────────────┘
//!             ▲                         ▲
//!   ┌─────────┴─────────┐     ┌─────────┴────────┐
//!   │   HTTP adapters   │     │  In-memory mocks │
//!   │   (infra_http)    │     │  (feature mock)  │
//!   └───────────────────┘     └──────────────────┘
//! ```
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait QuoteSubmissionPort: DomainPort + HealthCheckable {
//!     async fn submit_quote(&self, payload: &SubmissionPayload, metadata: Option<OperationMetadata>)
//!         -> Result<SubmissionReceipt, PortError>;
//! }
//! ```

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error type for port operations
///
/// Shared by every adapter so the wizard can treat an HTTP failure and a
/// mock failure the same way.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested resource was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The remote side rejected the payload as invalid
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The remote side answered with a non-success status
    #[error("Rejected with status {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
    },

    /// Connection to the remote system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Rate limit exceeded on the remote API
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// The remote system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// A response body could not be decoded
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Maps a non-success HTTP status onto the matching variant
    ///
    /// - 401/403 -> `Unauthorized`
    /// - 404 -> `NotFound`
    /// - 422 -> `Validation`
    /// - 429 -> `RateLimited`
    /// - 5xx -> `ServiceUnavailable`
    /// - anything else -> `Rejected`
    pub fn from_status(status: u16, resource: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => PortError::Unauthorized { message },
            404 => PortError::not_found(resource, "-"),
            422 => PortError::validation(message),
            429 => PortError::RateLimited { retry_after_secs: 1 },
            500..=599 => PortError::ServiceUnavailable {
                service: format!("{} ({})", resource, status),
            },
            _ => PortError::Rejected { status, message },
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the resource was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if the remote side never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, PortError::Connection { .. } | PortError::Timeout { .. })
    }
}

/// Marker trait for all domain ports
///
/// Port traits extend this marker so they can be shared as
/// `Arc<dyn Port>` across tasks.
pub trait DomainPort: Send + Sync + 'static {}

/// Circuit breaker configuration for HTTP adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before opening the circuit
    pub failure_threshold: u32,
    /// Seconds the circuit stays open before letting a trial call through
    pub reset_timeout_secs: u64,
    /// Number of successful calls needed to close the circuit from half-open
    pub success_threshold: u32,
}

impl CircuitBreakerConfig {
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_secs(self.reset_timeout_secs)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout_secs: 30,
            success_threshold: 1,
        }
    }
}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    /// Reachable but refusing work (e.g. circuit open)
    Degraded,
    Unhealthy,
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Builds a result stamped with the current time
    pub fn new(adapter_id: impl Into<String>, status: AdapterHealth, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status,
            latency_ms,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}

/// Metadata about a port operation for tracing across systems
#[derive(Debug, Clone, Default)]
pub struct OperationMetadata {
    /// Correlation ID forwarded to the remote system
    pub correlation_id: Option<String>,
    /// Additional context as key-value pairs
    pub context: std::collections::HashMap<String, String>,
}

impl OperationMetadata {
    /// Creates new metadata with a correlation ID
    pub fn with_correlation_id(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
            ..Default::default()
        }
    }

    /// Adds context to the metadata
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}
