//! Plan Catalog Port
//!
//! The catalog is read-only and passed through as the backend publishes it.
//!
//! ```rust,ignore
//! let catalog: Arc<dyn PlanCatalogPort> = Arc::new(HttpPlanCatalog::new(config)?);
//! let plan = catalog.find_plan("as-300", None).await?;
//! ```

use async_trait::async_trait;
use tracing::debug;

use core_kernel::{DomainPort, HealthCheckable, OperationMetadata, PortError};

use crate::error::CatalogError;
use crate::plan::HealthPlan;

/// Source of health plan records
#[async_trait]
pub trait PlanCatalogPort: DomainPort + HealthCheckable {
    /// Every published plan, in backend order
    async fn list_plans(&self, metadata: Option<OperationMetadata>) -> Result<Vec<HealthPlan>, PortError>;
}

/// Convenience queries over any catalog port
#[async_trait]
pub trait PlanCatalogPortExt: PlanCatalogPort {
    async fn find_plan(
        &self,
        id: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<HealthPlan, CatalogError> {
        let plans = self.list_plans(metadata).await?;
        debug!(plan_id = id, listed = plans.len(), "Looking up plan");
        plans
            .into_iter()
            .find(|plan| plan.id == id)
            .ok_or_else(|| CatalogError::PlanNotFound(id.to_string()))
    }
}

impl<T: PlanCatalogPort + ?Sized> PlanCatalogPortExt for T {}

/// Mock implementation of PlanCatalogPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use tokio::sync::RwLock;
    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory catalog
    #[derive(Debug, Default)]
    pub struct MockPlanCatalog {
        plans: RwLock<Vec<HealthPlan>>,
        failures: RwLock<VecDeque<PortError>>,
    }

    impl MockPlanCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_plans(plans: Vec<HealthPlan>) -> Self {
            Self {
                plans: RwLock::new(plans),
                ..Default::default()
            }
        }

        pub async fn add_plan(&self, plan: HealthPlan) {
            self.plans.write().await.push(plan);
        }

        /// Makes the next call fail with `error`
        pub async fn fail_next(&self, error: PortError) {
            self.failures.write().await.push_back(error);
        }
    }

    impl DomainPort for MockPlanCatalog {}

    #[async_trait]
    impl HealthCheckable for MockPlanCatalog {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::new("mock-plan-catalog", AdapterHealth::Healthy, 0)
                .with_message("Mock adapter always healthy")
        }
    }

    #[async_trait]
    impl PlanCatalogPort for MockPlanCatalog {
        async fn list_plans(&self, _metadata: Option<OperationMetadata>) -> Result<Vec<HealthPlan>, PortError> {
            if let Some(error) = self.failures.write().await.pop_front() {
                return Err(error);
            }
            Ok(self.plans.read().await.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockPlanCatalog;
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn plan(id: &str, provider: &str, price: Decimal) -> HealthPlan {
        HealthPlan {
            id: id.to_string(),
            name: format!("Plan {}", id),
            provider: provider.to_string(),
            price,
            rating: 4.0,
            line: "Classic".to_string(),
            attributes: vec![],
            clinics: vec![],
            images: vec![],
            brochures: vec![],
        }
    }

    #[tokio::test]
    async fn test_find_plan() {
        let catalog = MockPlanCatalog::new();
        catalog.add_plan(plan("x", "Avalian", dec!(1))).await;

        assert_eq!(catalog.find_plan("x", None).await.unwrap().id, "x");
        assert!(matches!(
            catalog.find_plan("y", None).await,
            Err(CatalogError::PlanNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_port_failure_propagates() {
        let catalog = MockPlanCatalog::new();
        catalog.fail_next(PortError::ServiceUnavailable { service: "catalog".to_string() }).await;

        let err = catalog.find_plan("x", None).await.unwrap_err();
        assert!(err.is_transient());
        assert!(catalog.list_plans(None).await.is_ok());
    }
}
