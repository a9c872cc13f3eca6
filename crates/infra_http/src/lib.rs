//! HTTP Infrastructure
//!
//! `reqwest`-backed adapters for the two outbound ports:
//!
//! - [`HttpQuoteSubmitter`] posts the submission payload as JSON to the
//!   quote endpoint. Any 2xx is success; it never retries, since a repeated
//!   POST could file the same quote twice.
//! - [`HttpPlanCatalog`] reads `{base}/planes` and retries transient
//!   failures with exponential backoff.
//!
//! Both guard their calls with a [`CircuitBreaker`] and report `Degraded`
//! from their health check while it is open.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_http::{HttpQuoteSubmitter, HttpSubmitterConfig};
//!
//! let submitter = HttpQuoteSubmitter::new(
//!     HttpSubmitterConfig::new("https://quotes.example.com/cotizacion").timeout_secs(10),
//! )?;
//! ```

pub mod circuit_breaker;
pub mod config;
pub mod transport;
pub mod submitter;
pub mod catalog;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use config::{HttpSubmitterConfig, HttpCatalogConfig, DEFAULT_QUOTE_ENDPOINT};
pub use submitter::HttpQuoteSubmitter;
pub use catalog::HttpPlanCatalog;
