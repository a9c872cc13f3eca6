//! API configuration

use serde::Deserialize;

use core_kernel::CircuitBreakerConfig;
use infra_http::{HttpCatalogConfig, HttpSubmitterConfig, DEFAULT_QUOTE_ENDPOINT};

/// API configuration
///
/// Every field can be set from the environment with the `QUOTE_API_` prefix,
/// nested fields joined by `__`:
///
/// ```bash
/// QUOTE_API_PORT=9000
/// QUOTE_API_QUOTE_ENDPOINT=http://localhost:4000/cotizacion
/// QUOTE_API_CIRCUIT_BREAKER__FAILURE_THRESHOLD=3
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
    /// URL quote submissions are POSTed to
    pub quote_endpoint: String,
    /// Plan catalog API root
    pub catalog_base_url: String,
    /// Timeout for outbound HTTP calls
    pub timeout_secs: u64,
    /// Retries for plan catalog reads
    pub catalog_retry_attempts: u32,
    /// Seconds a quote session may sit idle before it is evicted
    pub session_ttl_secs: u64,
    /// Seconds between idle session sweeps
    pub session_sweep_interval_secs: u64,
    pub circuit_breaker: CircuitBreakerConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_json: false,
            quote_endpoint: DEFAULT_QUOTE_ENDPOINT.to_string(),
            catalog_base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            catalog_retry_attempts: 3,
            session_ttl_secs: 1800,
            session_sweep_interval_secs: 60,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("QUOTE_API")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Idle session TTL, capped at a century
    pub fn session_ttl(&self) -> chrono::Duration {
        const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;
        chrono::Duration::seconds(self.session_ttl_secs.min(MAX_TTL_SECS) as i64)
    }

    pub fn session_sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }

    pub fn submitter_config(&self) -> HttpSubmitterConfig {
        HttpSubmitterConfig::new(self.quote_endpoint.clone())
            .timeout_secs(self.timeout_secs)
            .circuit_breaker(self.circuit_breaker.clone())
    }

    pub fn catalog_config(&self) -> HttpCatalogConfig {
        HttpCatalogConfig::new(self.catalog_base_url.clone())
            .timeout_secs(self.timeout_secs)
            .retry_attempts(self.catalog_retry_attempts)
            .circuit_breaker(self.circuit_breaker.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert!(!config.log_json);
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(30));
    }

    #[test]
    fn test_session_timing_bounds() {
        let config = ApiConfig {
            session_ttl_secs: 90,
            session_sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.session_ttl(), chrono::Duration::seconds(90));
        assert_eq!(config.session_sweep_interval(), std::time::Duration::from_secs(1));

        let forever = ApiConfig {
            session_ttl_secs: u64::MAX,
            ..Default::default()
        };
        assert_eq!(forever.session_ttl(), chrono::Duration::days(36_500));
    }

    #[test]
    fn test_adapter_configs_share_timeout_and_breaker() {
        let config = ApiConfig {
            timeout_secs: 5,
            quote_endpoint: "http://quotes.test/cotizacion".to_string(),
            ..Default::default()
        };

        let submitter = config.submitter_config();
        assert_eq!(submitter.endpoint, "http://quotes.test/cotizacion");
        assert_eq!(submitter.timeout_secs, 5);
        assert_eq!(submitter.circuit_breaker, Some(config.circuit_breaker.clone()));

        let catalog = config.catalog_config();
        assert_eq!(catalog.timeout_secs, 5);
        assert_eq!(catalog.retry_attempts, 3);
    }
}
