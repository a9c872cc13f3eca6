//! Quote Submission Port
//!
//! The wizard hands its finished payload to a [`QuoteSubmissionPort`]. The
//! production adapter posts JSON over HTTP (`infra_http`); the mock keeps
//! payloads in memory and can be told to fail.
//!
//! ```rust,ignore
//! let port: Arc<dyn QuoteSubmissionPort> = Arc::new(HttpQuoteSubmitter::new(config)?);
//! let receipt = port.submit_quote(&payload, None).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, HealthCheckable, OperationMetadata, PortError, SubmissionId};

use crate::payload::SubmissionPayload;

/// Acknowledgement of an accepted submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: SubmissionId,
    pub accepted_at: DateTime<Utc>,
    /// Response body, when the backend sent JSON
    pub response: Option<serde_json::Value>,
}

impl SubmissionReceipt {
    pub fn new(response: Option<serde_json::Value>) -> Self {
        Self {
            submission_id: SubmissionId::new_v7(),
            accepted_at: Utc::now(),
            response,
        }
    }
}

/// Delivers a completed quote request to the backend
///
/// Any non-success answer or transport failure is an `Err`; the wizard
/// treats every `Err` as a retryable submission failure.
#[async_trait]
pub trait QuoteSubmissionPort: DomainPort + HealthCheckable {
    async fn submit_quote(
        &self,
        payload: &SubmissionPayload,
        metadata: Option<OperationMetadata>,
    ) -> Result<SubmissionReceipt, PortError>;
}

/// Mock implementation of QuoteSubmissionPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;
    use tokio::sync::RwLock;
    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory submission port
    ///
    /// Queued failures are returned first, one per call; once the queue is
    /// empty every call succeeds and the payload is recorded.
    #[derive(Debug, Default)]
    pub struct MockSubmissionPort {
        accepted: RwLock<Vec<SubmissionPayload>>,
        failures: RwLock<VecDeque<PortError>>,
        attempts: RwLock<usize>,
        latency: Option<Duration>,
    }

    impl MockSubmissionPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Delays every call, for exercising in-flight behavior
        pub fn with_latency(latency: Duration) -> Self {
            Self {
                latency: Some(latency),
                ..Default::default()
            }
        }

        /// Makes the next call fail with `error`
        pub async fn fail_next(&self, error: PortError) {
            self.failures.write().await.push_back(error);
        }

        /// Payloads accepted so far
        pub async fn accepted(&self) -> Vec<SubmissionPayload> {
            self.accepted.read().await.clone()
        }

        /// Calls made so far, failed or not
        pub async fn attempts(&self) -> usize {
            *self.attempts.read().await
        }
    }

    impl DomainPort for MockSubmissionPort {}

    #[async_trait]
    impl HealthCheckable for MockSubmissionPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::new("mock-submission-port", AdapterHealth::Healthy, 0)
                .with_message("Mock adapter always healthy")
        }
    }

    #[async_trait]
    impl QuoteSubmissionPort for MockSubmissionPort {
        async fn submit_quote(
            &self,
            payload: &SubmissionPayload,
            _metadata: Option<OperationMetadata>,
        ) -> Result<SubmissionReceipt, PortError> {
            *self.attempts.write().await += 1;

            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }

            if let Some(error) = self.failures.write().await.pop_front() {
                return Err(error);
            }

            self.accepted.write().await.push(payload.clone());
            Ok(SubmissionReceipt::new(Some(serde_json::json!({ "success": true }))))
        }
    }
}
