//! Adapter configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use core_kernel::CircuitBreakerConfig;

/// Quote endpoint used when none is configured
pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://servidorplus.avalianonline.com.ar/cotizacion";

/// Configuration for [`HttpQuoteSubmitter`](crate::HttpQuoteSubmitter)
///
/// ```rust
/// use infra_http::HttpSubmitterConfig;
///
/// let config = HttpSubmitterConfig::new("http://localhost:9000/cotizacion")
///     .timeout_secs(5)
///     .without_circuit_breaker();
/// assert!(config.circuit_breaker.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSubmitterConfig {
    /// Full URL the payload is POSTed to
    pub endpoint: String,
    pub timeout_secs: u64,
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl HttpSubmitterConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = Some(config);
        self
    }

    pub fn without_circuit_breaker(mut self) -> Self {
        self.circuit_breaker = None;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpSubmitterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_QUOTE_ENDPOINT.to_string(),
            timeout_secs: 30,
            circuit_breaker: Some(CircuitBreakerConfig::default()),
        }
    }
}

/// Configuration for [`HttpPlanCatalog`](crate::HttpPlanCatalog)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCatalogConfig {
    /// Catalog API root; plans are read from `{base_url}/planes`
    pub base_url: String,
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure
    pub retry_attempts: u32,
    /// Delay before the first retry, doubled on each further one
    pub retry_backoff_ms: u64,
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl HttpCatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    pub fn circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = Some(config);
        self
    }

    pub fn without_circuit_breaker(mut self) -> Self {
        self.circuit_breaker = None;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn plans_url(&self) -> String {
        format!("{}/planes", self.base_url.trim_end_matches('/'))
    }

    /// Backoff before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

impl Default for HttpCatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            retry_attempts: 3,
            retry_backoff_ms: 200,
            circuit_breaker: Some(CircuitBreakerConfig::default()),
        }
    }
}
