//! Plan catalog over HTTP

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError,
};
use domain_catalog::{HealthPlan, PlanCatalogPort};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::HttpCatalogConfig;
use crate::transport::{build_client, counts_against_breaker, map_request_error, CORRELATION_HEADER};

const ADAPTER_ID: &str = "http-plan-catalog";

#[derive(Debug)]
pub struct HttpPlanCatalog {
    client: reqwest::Client,
    config: HttpCatalogConfig,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl HttpPlanCatalog {
    pub fn new(config: HttpCatalogConfig) -> Result<Self, PortError> {
        let client = build_client(config.timeout())?;
        let circuit_breaker = config
            .circuit_breaker
            .clone()
            .map(|cb| Arc::new(CircuitBreaker::new("plan catalog", cb)));

        Ok(Self {
            client,
            config,
            circuit_breaker,
        })
    }

    pub async fn is_circuit_open(&self) -> bool {
        match self.circuit_breaker {
            Some(ref cb) => !cb.is_available().await,
            None => false,
        }
    }

    async fn fetch(&self, url: &str, metadata: Option<&OperationMetadata>) -> Result<Vec<HealthPlan>, PortError> {
        if let Some(ref cb) = self.circuit_breaker {
            cb.guard().await?;
        }

        let result = self.get(url, metadata).await;
        if let Some(ref cb) = self.circuit_breaker {
            match &result {
                Ok(_) => cb.record_success(),
                Err(error) if counts_against_breaker(error) => cb.record_failure().await,
                Err(_) => {}
            }
        }
        result
    }

    async fn get(&self, url: &str, metadata: Option<&OperationMetadata>) -> Result<Vec<HealthPlan>, PortError> {
        let mut request = self.client.get(url);
        if let Some(correlation_id) = metadata.and_then(|m| m.correlation_id.as_deref()) {
            request = request.header(CORRELATION_HEADER, correlation_id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_request_error(e, "list_plans", self.config.timeout()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            return Err(PortError::from_status(status.as_u16(), "plans", reason));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_request_error(e, "list_plans", self.config.timeout()))?;

        serde_json::from_slice(&bytes).map_err(|e| PortError::Transformation {
            message: format!("Invalid plan catalog response: {}", e),
        })
    }
}

impl DomainPort for HttpPlanCatalog {}

#[async_trait]
impl HealthCheckable for HttpPlanCatalog {
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
        .with_message(format!("Reading plans from {}", self.config.plans_url()))
    }
}

#[async_trait]
impl PlanCatalogPort for HttpPlanCatalog {
    #[instrument(skip(self, metadata), fields(base_url = %self.config.base_url))]
    async fn list_plans(&self, metadata: Option<OperationMetadata>) -> Result<Vec<HealthPlan>, PortError> {
        let url = self.config.plans_url();
        let mut retry = 0;

        loop {
            match self.fetch(&url, metadata.as_ref()).await {
                Ok(plans) => {
                    debug!(count = plans.len(), retries = retry, "Plans fetched");
                    return Ok(plans);
                }
                Err(error)
                    if error.is_transient()
                        && retry < self.config.retry_attempts
                        && !self.is_circuit_open().await =>
                {
                    retry += 1;
                    let delay = self.config.backoff(retry);
                    warn!(error = %error, retry, delay_ms = delay.as_millis() as u64, "Retrying plan catalog request");
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    warn!(error = %error, retries = retry, "Plan catalog request failed");
                    return Err(error);
                }
            }
        }
    }
}
