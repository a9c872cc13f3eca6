//! Health Plan Catalog
//!
//! Read-only access to the plans the quote backend publishes. A plan carries
//! its provider, monthly price, rating, benefit attributes, the clinics in
//! its network, marketing images and brochure links.
//!
//! The wizard does not depend on this crate; the session API exposes the
//! catalog alongside it so a client can show plans while the customer fills
//! in a quote.

pub mod plan;
pub mod error;
pub mod ports;

pub use plan::{HealthPlan, PlanAttribute, AttributeGroup, Clinic, Location, PlanImage};
pub use error::CatalogError;
pub use ports::{PlanCatalogPort, PlanCatalogPortExt};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockPlanCatalog;
