//! Test Data Builders
//!
//! Builders for drafts and plans. Tests set only what they care about and
//! take the wizard's documented defaults for the rest.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_catalog::{Clinic, HealthPlan, Location};
use domain_quote::{
    ContactDetails, ContactMethod, EnrollmentType, HouseholdGroup, QuoteDraft, ResidenceZone,
};

/// Builder for constructing quote drafts
#[derive(Debug, Clone, Default)]
pub struct QuoteDraftBuilder {
    draft: QuoteDraft,
}

impl QuoteDraftBuilder {
    /// Starts from the default draft
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: HouseholdGroup) -> Self {
        self.draft.household_group = Some(group);
        self
    }

    pub fn with_zone(mut self, zone: ResidenceZone) -> Self {
        self.draft.residence_zone = Some(zone);
        self
    }

    pub fn with_primary_age(mut self, age: i64) -> Self {
        self.draft.primary_age = age;
        self
    }

    pub fn with_partner_age(mut self, age: i64) -> Self {
        self.draft.partner_age = age;
        self
    }

    /// Sets the child count and the first child's age
    pub fn with_children(mut self, count: i64, first_child_age: i64) -> Self {
        self.draft.child_count = count;
        self.draft.first_child_age = first_child_age;
        self
    }

    pub fn with_enrollment(mut self, enrollment: EnrollmentType) -> Self {
        self.draft.enrollment_type = Some(enrollment);
        self
    }

    pub fn with_salary(mut self, salary: i64) -> Self {
        self.draft.gross_salary = salary;
        self
    }

    pub fn with_contact(mut self, contact: ContactDetails) -> Self {
        self.draft.contact = contact;
        self
    }

    pub fn with_contact_method(mut self, method: ContactMethod) -> Self {
        self.draft.contact.preferred_contact_method = Some(method);
        self
    }

    pub fn build(self) -> QuoteDraft {
        self.draft
    }
}

/// Builder for constructing catalog plans
#[derive(Debug, Clone)]
pub struct TestPlanBuilder {
    plan: HealthPlan,
}

impl Default for TestPlanBuilder {
    fn default() -> Self {
        Self::new("plan-1")
    }
}

impl TestPlanBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            plan: HealthPlan {
                name: format!("Plan {}", id),
                id,
                provider: "Avalian".to_string(),
                price: dec!(45000),
                rating: 4.0,
                line: "Classic".to_string(),
                attributes: vec![],
                clinics: vec![],
                images: vec![],
                brochures: vec![],
            },
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.plan.provider = provider.into();
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.plan.price = price;
        self
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.plan.line = line.into();
        self
    }

    /// Adds a clinic with one location in `region`
    pub fn with_clinic_in(mut self, name: impl Into<String>, region: impl Into<String>) -> Self {
        let name = name.into();
        self.plan.clinics.push(Clinic {
            id: format!("clinic-{}", self.plan.clinics.len() + 1),
            name,
            entity: "clinic".to_string(),
            locations: vec![Location {
                address: "Av. Rivadavia 1000".to_string(),
                phone: "011-4000-0000".to_string(),
                neighborhood: String::new(),
                district: String::new(),
                region: region.into(),
                province: "Buenos Aires".to_string(),
                postal_code: "1000".to_string(),
            }],
        });
        self
    }

    pub fn build(self) -> HealthPlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_builder_keeps_defaults() {
        let draft = QuoteDraftBuilder::new()
            .with_group(HouseholdGroup::SelfChildren)
            .with_children(2, 7)
            .build();

        assert_eq!(draft.primary_age, 18);
        assert!(draft.agreed_to_terms);
        assert_eq!(draft.child_count, 2);
        assert_eq!(draft.first_child_age, 7);
    }

    #[test]
    fn test_plan_builder_clinic() {
        let plan = TestPlanBuilder::new("x")
            .with_clinic_in("Sanatorio Sur", "GBA Zona Sur")
            .build();
        assert_eq!(plan.clinics_in_region("GBA Zona Sur").count(), 1);
    }
}
