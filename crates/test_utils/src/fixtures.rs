//! Pre-built Test Fixtures
//!
//! Ready-to-use quote data. The reference quote is the one every suite
//! agrees on: Ana, 30, with her 28-year-old partner, living in CABA, joining
//! privately and asking to be contacted over WhatsApp.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_catalog::{HealthPlan, MockPlanCatalog, PlanAttribute};
use domain_quote::{
    ContactDetails, ContactMethod, EnrollmentType, FieldPath, HouseholdGroup, MockSubmissionPort,
    QuoteDraft, RecordingNotifier, ResidenceZone, WizardController,
};

/// Fixture for quote drafts
pub struct QuoteFixtures;

impl QuoteFixtures {
    /// The reference quote as a draft
    pub fn reference_draft() -> QuoteDraft {
        QuoteDraft {
            household_group: Some(HouseholdGroup::SelfPartner),
            residence_zone: Some(ResidenceZone::Caba),
            primary_age: 30,
            partner_age: 28,
            child_count: 0,
            first_child_age: 0,
            enrollment_type: Some(EnrollmentType::Private),
            gross_salary: 0,
            contact: Self::reference_contact(),
            agreed_to_terms: true,
        }
    }

    pub fn reference_contact() -> ContactDetails {
        ContactDetails {
            full_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "1111".to_string(),
            region: String::new(),
            preferred_contact_method: Some(ContactMethod::Whatsapp),
        }
    }

    /// Inputs that produce the reference draft, step by step
    ///
    /// Each inner list is applied before advancing from that step.
    pub fn reference_inputs() -> Vec<Vec<(FieldPath, &'static str)>> {
        vec![
            vec![
                (FieldPath::HouseholdGroup, "SELF_PARTNER"),
                (FieldPath::ResidenceZone, "CABA"),
            ],
            vec![(FieldPath::PrimaryAge, "30"), (FieldPath::PartnerAge, "28")],
            vec![(FieldPath::EnrollmentType, "PRIVATE")],
            vec![
                (FieldPath::ContactFullName, "Ana"),
                (FieldPath::ContactEmail, "ana@example.com"),
                (FieldPath::ContactPhone, "1111"),
                (FieldPath::ContactMethod, "WHATSAPP"),
            ],
        ]
    }

    /// The reference submission in the backend's wire shape
    pub fn reference_wire_payload() -> serde_json::Value {
        serde_json::json!({
            "group": "2",
            "edad_1": 30,
            "edad_2": 28,
            "cantidadDeHijos": 0,
            "edadHijo1": 0,
            "residencia": "CABA",
            "tipo": "P",
            "agree": true,
            "aporteOS": 0,
            "sueldo": 0,
            "personalData": {
                "name": "Ana",
                "email": "ana@example.com",
                "phone": "1111",
                "region": "",
                "medioContacto": "whatsapp"
            }
        })
    }
}

/// A wizard wired to in-memory collaborators
pub struct TestWizard {
    pub wizard: WizardController,
    pub port: Arc<MockSubmissionPort>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestWizard {
    pub fn new() -> Self {
        Self::with_port(MockSubmissionPort::new())
    }

    pub fn with_port(port: MockSubmissionPort) -> Self {
        let port = Arc::new(port);
        let notifier = Arc::new(RecordingNotifier::new());
        let wizard = WizardController::new(port.clone(), notifier.clone());
        Self {
            wizard,
            port,
            notifier,
        }
    }

    /// Enters the reference inputs and advances to the contact step
    pub fn at_reference_contact_step() -> Self {
        let mut test = Self::new();
        test.fill_reference_to_contact();
        test
    }

    /// Applies the reference inputs for steps 1-3, advancing after each, then fills step 4
    pub fn fill_reference_to_contact(&mut self) {
        let inputs = QuoteFixtures::reference_inputs();
        let last = inputs.len() - 1;
        for (index, step_inputs) in inputs.into_iter().enumerate() {
            for (field, raw) in step_inputs {
                self.wizard
                    .set_field(field, raw)
                    .unwrap_or_else(|e| panic!("setting {} failed: {}", field, e));
            }
            if index < last {
                self.wizard
                    .try_advance()
                    .unwrap_or_else(|e| panic!("advancing from step {} failed: {}", index + 1, e));
            }
        }
    }
}

impl Default for TestWizard {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture for catalog plans
pub struct PlanFixtures;

impl PlanFixtures {
    pub fn plan(id: &str, provider: &str, price: Decimal) -> HealthPlan {
        HealthPlan {
            id: id.to_string(),
            name: format!("Plan {}", id),
            provider: provider.to_string(),
            price,
            rating: 4.0,
            line: "Classic".to_string(),
            attributes: vec![PlanAttribute {
                name: "Internacion".to_string(),
                value: "100%".to_string(),
                group: "Coberturas".to_string(),
                order: Some(1),
                group_order: Some(1),
            }],
            clinics: vec![],
            images: vec![],
            brochures: vec![],
        }
    }

    /// Three plans across two providers
    pub fn catalog() -> Vec<HealthPlan> {
        vec![
            Self::plan("as-200", "Avalian", dec!(41000)),
            Self::plan("as-300", "Avalian", dec!(58000)),
            Self::plan("g-azul", "Galeno", dec!(36500)),
        ]
    }

    pub fn mock_catalog() -> MockPlanCatalog {
        MockPlanCatalog::with_plans(Self::catalog())
    }
}
