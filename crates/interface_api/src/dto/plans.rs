//! Plan catalog DTOs

use rust_decimal::Decimal;
use serde::Serialize;

use domain_catalog::{AttributeGroup, Clinic, HealthPlan, PlanImage};

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub provider: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub rating: f64,
    pub line: String,
    pub attribute_groups: Vec<AttributeGroup>,
    pub clinics: Vec<Clinic>,
    pub images: Vec<PlanImage>,
    pub brochures: Vec<String>,
}

impl From<HealthPlan> for PlanResponse {
    fn from(plan: HealthPlan) -> Self {
        let attribute_groups = plan.grouped_attributes();
        Self {
            id: plan.id,
            name: plan.name,
            provider: plan.provider,
            price: plan.price,
            rating: plan.rating,
            line: plan.line,
            attribute_groups,
            clinics: plan.clinics,
            images: plan.images,
            brochures: plan.brochures,
        }
    }
}
