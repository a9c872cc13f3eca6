//! Custom Test Assertions
//!
//! Assertion helpers for wizard state that give more meaningful failure
//! messages than a bare `assert_eq!`.

use domain_quote::{
    FieldPath, QuoteDraft, QuoteError, Step, SubmissionPayload, WizardController,
};

/// Asserts the wizard is on `expected`
pub fn assert_on_step(wizard: &WizardController, expected: Step) {
    assert_eq!(
        wizard.step(),
        expected,
        "Expected wizard on {} but it is on {} (last error: {:?})",
        expected,
        wizard.step(),
        wizard.last_error()
    );
}

/// Asserts `result` failed validation on `field`
pub fn assert_validation_error<T: std::fmt::Debug>(result: Result<T, QuoteError>, field: FieldPath) {
    match result {
        Err(QuoteError::Validation(error)) => assert_eq!(
            error.field, field,
            "Validation failed on {} instead of {}: {}",
            error.field, field, error.message
        ),
        other => panic!("Expected validation error on {}, got {:?}", field, other),
    }
}

/// Asserts a payload carries every draft value unchanged
pub fn assert_payload_matches_draft(payload: &SubmissionPayload, draft: &QuoteDraft) {
    assert_eq!(payload.group, draft.household_group, "group");
    assert_eq!(payload.residence_zone, draft.residence_zone, "residence zone");
    assert_eq!(payload.primary_age, draft.primary_age, "primary age");
    assert_eq!(payload.partner_age, draft.partner_age, "partner age");
    assert_eq!(payload.child_count, draft.child_count, "child count");
    assert_eq!(payload.first_child_age, draft.first_child_age, "first child age");
    assert_eq!(payload.enrollment_type, draft.enrollment_type, "enrollment type");
    assert_eq!(payload.gross_salary, draft.gross_salary, "gross salary");
    assert_eq!(payload.agreed_to_terms, draft.agreed_to_terms, "agreed to terms");
    assert_eq!(payload.social_insurance_contribution, 0, "social insurance contribution");
    assert_eq!(payload.contact.full_name, draft.contact.full_name, "contact name");
    assert_eq!(payload.contact.email, draft.contact.email, "contact email");
    assert_eq!(payload.contact.phone, draft.contact.phone, "contact phone");
    assert_eq!(payload.contact.region, draft.contact.region, "contact region");
    assert_eq!(
        payload.contact.preferred_contact_method, draft.contact.preferred_contact_method,
        "contact method"
    );
}

/// Asserts a JSON error body has the given `error` kind
pub fn assert_error_body(body: &serde_json::Value, error_type: &str) {
    assert_eq!(
        body["error"].as_str(),
        Some(error_type),
        "Unexpected error body: {}",
        body
    );
    assert!(
        body["message"].as_str().is_some_and(|m| !m.is_empty()),
        "Error body without message: {}",
        body
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::QuoteFixtures;

    #[test]
    fn test_payload_matches_reference_draft() {
        let draft = QuoteFixtures::reference_draft();
        assert_payload_matches_draft(&SubmissionPayload::from_draft(&draft), &draft);
    }

    #[test]
    fn test_reference_wire_payload_matches_serialization() {
        let payload = SubmissionPayload::from_draft(&QuoteFixtures::reference_draft());
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            QuoteFixtures::reference_wire_payload()
        );
    }

    #[test]
    #[should_panic(expected = "Expected validation error")]
    fn test_validation_assertion_rejects_success() {
        assert_validation_error::<()>(Ok(()), FieldPath::HouseholdGroup);
    }
}
