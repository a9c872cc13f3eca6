//! Catalog domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while browsing the plan catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No plan with the given identifier
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    /// The catalog backend failed
    #[error(transparent)]
    Port(#[from] PortError),
}

impl CatalogError {
    /// Whether the request may succeed if repeated later
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Port(e) if e.is_transient())
    }
}
