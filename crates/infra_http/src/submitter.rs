//! Quote submission over HTTP
//!
//! One POST per call, JSON body in the backend's wire shape. The response
//! body is kept on the receipt when it parses as JSON; an empty or non-JSON
//! body on a 2xx is still a success.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError,
};
use domain_quote::{QuoteSubmissionPort, SubmissionPayload, SubmissionReceipt};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::HttpSubmitterConfig;
use crate::transport::{build_client, counts_against_breaker, map_request_error, CORRELATION_HEADER};

const ADAPTER_ID: &str = "http-quote-submitter";

#[derive(Debug)]
pub struct HttpQuoteSubmitter {
    client: reqwest::Client,
    config: HttpSubmitterConfig,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl HttpQuoteSubmitter {
    pub fn new(config: HttpSubmitterConfig) -> Result<Self, PortError> {
        let client = build_client(config.timeout())?;
        let circuit_breaker = config
            .circuit_breaker
            .clone()
            .map(|cb| Arc::new(CircuitBreaker::new("quote backend", cb)));

        Ok(Self {
            client,
            config,
            circuit_breaker,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub async fn is_circuit_open(&self) -> bool {
        match self.circuit_breaker {
            Some(ref cb) => !cb.is_available().await,
            None => false,
        }
    }

    async fn post(&self, payload: &SubmissionPayload, metadata: Option<&OperationMetadata>) -> Result<SubmissionReceipt, PortError> {
        let mut request = self.client.post(&self.config.endpoint).json(payload);
        if let Some(correlation_id) = metadata.and_then(|m| m.correlation_id.as_deref()) {
            request = request.header(CORRELATION_HEADER, correlation_id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_request_error(e, "submit_quote", self.config.timeout()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::from_status(status.as_u16(), "quote", body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_request_error(e, "submit_quote", self.config.timeout()))?;
        let body = serde_json::from_slice::<serde_json::Value>(&bytes).ok();
        if body.is_none() && !bytes.is_empty() {
            debug!(bytes = bytes.len(), "Quote backend answered with a non-JSON body");
        }

        Ok(SubmissionReceipt::new(body))
    }
}

impl DomainPort for HttpQuoteSubmitter {}

#[async_trait]
impl HealthCheckable for HttpQuoteSubmitter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        if self.is_circuit_open().await {
            return HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Degraded, 0)
                .with_message("Circuit breaker is open");
        }

        HealthCheckResult::new(
            ADAPTER_ID,
            AdapterHealth::Healthy,
            start.elapsed().as_millis() as u64,
        )
        .with_message(format!("Submitting to {}", self.config.endpoint))
    }
}

#[async_trait]
impl QuoteSubmissionPort for HttpQuoteSubmitter {
    #[instrument(skip(self, payload, metadata), fields(endpoint = %self.config.endpoint))]
    async fn submit_quote(
        &self,
        payload: &SubmissionPayload,
        metadata: Option<OperationMetadata>,
    ) -> Result<SubmissionReceipt, PortError> {
        if let Some(ref cb) = self.circuit_breaker {
            cb.guard().await?;
        }

        let start = Instant::now();
        let result = self.post(payload, metadata.as_ref()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(receipt) => {
                debug!(submission_id = %receipt.submission_id, elapsed_ms, "Quote accepted");
                if let Some(ref cb) = self.circuit_breaker {
                    cb.record_success();
                }
            }
            Err(error) => {
                warn!(error = %error, elapsed_ms, "Quote submission request failed");
                if let Some(ref cb) = self.circuit_breaker {
                    if counts_against_breaker(error) {
                        cb.record_failure().await;
                    }
                }
            }
        }

        result
    }
}
