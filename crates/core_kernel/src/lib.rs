//! Core Kernel - Foundational types shared by the quote system
//!
//! This crate provides the building blocks used across the domain and
//! adapter crates:
//! - Strongly-typed identifiers for sessions and submissions
//! - The kernel error type
//! - Port infrastructure for the hexagonal (ports and adapters) layout

pub mod error;
pub mod identifiers;
pub mod ports;

pub use error::CoreError;
pub use identifiers::{QuoteSessionId, SubmissionId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    CircuitBreakerConfig, OperationMetadata,
};
