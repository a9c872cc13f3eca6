//! Step decision table
//!
//! One static table says, for every step, which fields are shown and which
//! of them must hold before the step can be left. Display and validation
//! both read it, so they cannot drift apart.
//!
//! | Step | Field | Shown when | Required |
//! |---|---|---|---|
//! | 1 | householdGroup | always | chosen |
//! | 1 | residenceZone | always | chosen |
//! | 2 | primaryAge | always | >= 1 |
//! | 2 | partnerAge | group has a partner | no |
//! | 2 | childCount | group has children | no |
//! | 2 | firstChildAge | group has children and childCount > 0 | no |
//! | 3 | enrollmentType | always | chosen |
//! | 3 | grossSalary | employee with social insurance | no |
//! | 4 | contact.* | always | no |

use crate::draft::QuoteDraft;
use crate::error::ValidationError;
use crate::field::FieldPath;
use crate::step::Step;

/// When a field is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Always,
    PartnerInGroup,
    ChildrenInGroup,
    ChildrenDeclared,
    Salaried,
}

impl Visibility {
    fn holds(&self, draft: &QuoteDraft) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::PartnerInGroup => draft.includes_partner(),
            Visibility::ChildrenInGroup => draft.includes_children(),
            Visibility::ChildrenDeclared => draft.has_declared_children(),
            Visibility::Salaried => draft.is_salaried(),
        }
    }
}

/// What a shown field must satisfy to leave the step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    /// A choice field has a value
    Chosen,
    /// An integer field is at least this value
    AtLeast(i64),
}

impl Requirement {
    fn holds(&self, field: FieldPath, draft: &QuoteDraft) -> bool {
        match (self, field) {
            (Requirement::Chosen, FieldPath::HouseholdGroup) => draft.household_group.is_some(),
            (Requirement::Chosen, FieldPath::ResidenceZone) => draft.residence_zone.is_some(),
            (Requirement::Chosen, FieldPath::EnrollmentType) => draft.enrollment_type.is_some(),
            (Requirement::Chosen, FieldPath::ContactMethod) => {
                draft.contact.preferred_contact_method.is_some()
            }
            (Requirement::AtLeast(min), FieldPath::PrimaryAge) => draft.primary_age >= *min,
            (Requirement::AtLeast(min), FieldPath::PartnerAge) => draft.partner_age >= *min,
            (Requirement::AtLeast(min), FieldPath::ChildCount) => draft.child_count >= *min,
            (Requirement::AtLeast(min), FieldPath::FirstChildAge) => draft.first_child_age >= *min,
            (Requirement::AtLeast(min), FieldPath::GrossSalary) => draft.gross_salary >= *min,
            // No table row pairs a requirement with a text field
            _ => true,
        }
    }
}

struct FieldRule {
    step: Step,
    field: FieldPath,
    visible: Visibility,
    required: Option<(Requirement, &'static str)>,
}

const fn shown(step: Step, field: FieldPath, visible: Visibility) -> FieldRule {
    FieldRule { step, field, visible, required: None }
}

const fn required(step: Step, field: FieldPath, requirement: Requirement, message: &'static str) -> FieldRule {
    FieldRule {
        step,
        field,
        visible: Visibility::Always,
        required: Some((requirement, message)),
    }
}

const DECISION_TABLE: &[FieldRule] = &[
    required(Step::HouseholdAndZone, FieldPath::HouseholdGroup, Requirement::Chosen, "Please choose who the plan is for"),
    required(Step::HouseholdAndZone, FieldPath::ResidenceZone, Requirement::Chosen, "Please choose the zone you live in"),
    required(Step::Ages, FieldPath::PrimaryAge, Requirement::AtLeast(1), "Please enter your age"),
    shown(Step::Ages, FieldPath::PartnerAge, Visibility::PartnerInGroup),
    shown(Step::Ages, FieldPath::ChildCount, Visibility::ChildrenInGroup),
    shown(Step::Ages, FieldPath::FirstChildAge, Visibility::ChildrenDeclared),
    required(Step::Enrollment, FieldPath::EnrollmentType, Requirement::Chosen, "Please choose how you would join the plan"),
    shown(Step::Enrollment, FieldPath::GrossSalary, Visibility::Salaried),
    shown(Step::Contact, FieldPath::ContactFullName, Visibility::Always),
    shown(Step::Contact, FieldPath::ContactEmail, Visibility::Always),
    shown(Step::Contact, FieldPath::ContactPhone, Visibility::Always),
    shown(Step::Contact, FieldPath::ContactMethod, Visibility::Always),
];

fn visible_rules(step: Step, draft: &QuoteDraft) -> impl Iterator<Item = &'static FieldRule> + '_ {
    DECISION_TABLE
        .iter()
        .filter(move |rule| rule.step == step && rule.visible.holds(draft))
}

/// Fields shown on `step` for the current answers, in display order
pub fn relevant_fields(step: Step, draft: &QuoteDraft) -> Vec<FieldPath> {
    visible_rules(step, draft).map(|rule| rule.field).collect()
}

/// Fields that must hold before `step` can be left
pub fn required_fields(step: Step, draft: &QuoteDraft) -> Vec<FieldPath> {
    visible_rules(step, draft)
        .filter(|rule| rule.required.is_some())
        .map(|rule| rule.field)
        .collect()
}

/// True when `field` is required on `step` for the current answers
pub fn is_required(step: Step, field: FieldPath, draft: &QuoteDraft) -> bool {
    required_fields(step, draft).contains(&field)
}

/// Checks the step's requirements, reporting the first unmet one
pub fn validate_step(step: Step, draft: &QuoteDraft) -> Result<(), ValidationError> {
    for rule in visible_rules(step, draft) {
        if let Some((requirement, message)) = rule.required {
            if !requirement.holds(rule.field, draft) {
                return Err(ValidationError {
                    step,
                    field: rule.field,
                    message: message.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{EnrollmentType, HouseholdGroup, ResidenceZone};

    #[test]
    fn test_step_one_requires_group_before_zone() {
        let draft = QuoteDraft::default();
        let err = validate_step(Step::HouseholdAndZone, &draft).unwrap_err();
        assert_eq!(err.field, FieldPath::HouseholdGroup);

        let draft = QuoteDraft {
            household_group: Some(HouseholdGroup::SelfOnly),
            ..Default::default()
        };
        let err = validate_step(Step::HouseholdAndZone, &draft).unwrap_err();
        assert_eq!(err.field, FieldPath::ResidenceZone);
    }

    #[test]
    fn test_ages_relevance_follows_group() {
        let mut draft = QuoteDraft {
            household_group: Some(HouseholdGroup::SelfPartnerChildren),
            residence_zone: Some(ResidenceZone::Caba),
            ..Default::default()
        };
        assert_eq!(
            relevant_fields(Step::Ages, &draft),
            vec![FieldPath::PrimaryAge, FieldPath::PartnerAge, FieldPath::ChildCount]
        );

        draft.child_count = 2;
        assert_eq!(
            relevant_fields(Step::Ages, &draft),
            vec![
                FieldPath::PrimaryAge,
                FieldPath::PartnerAge,
                FieldPath::ChildCount,
                FieldPath::FirstChildAge
            ]
        );

        draft.household_group = Some(HouseholdGroup::SelfOnly);
        assert_eq!(relevant_fields(Step::Ages, &draft), vec![FieldPath::PrimaryAge]);
    }

    #[test]
    fn test_primary_age_floor() {
        let mut draft = QuoteDraft::default();
        draft.primary_age = 0;
        assert!(validate_step(Step::Ages, &draft).is_err());
        draft.primary_age = 1;
        assert!(validate_step(Step::Ages, &draft).is_ok());
    }

    #[test]
    fn test_salary_shown_only_for_employees() {
        let mut draft = QuoteDraft::default();
        draft.enrollment_type = Some(EnrollmentType::Private);
        assert_eq!(relevant_fields(Step::Enrollment, &draft), vec![FieldPath::EnrollmentType]);

        draft.enrollment_type = Some(EnrollmentType::EmployeeWithSocialInsurance);
        assert!(relevant_fields(Step::Enrollment, &draft).contains(&FieldPath::GrossSalary));
        assert_eq!(required_fields(Step::Enrollment, &draft), vec![FieldPath::EnrollmentType]);
    }

    #[test]
    fn test_contact_and_completed_require_nothing() {
        let draft = QuoteDraft::default();
        assert!(required_fields(Step::Contact, &draft).is_empty());
        assert!(validate_step(Step::Contact, &draft).is_ok());
        assert!(relevant_fields(Step::Completed, &draft).is_empty());
    }

    #[test]
    fn test_required_is_subset_of_relevant() {
        let draft = QuoteDraft::default();
        for step in Step::ALL {
            let relevant = relevant_fields(step, &draft);
            for field in required_fields(step, &draft) {
                assert!(relevant.contains(&field));
                assert!(is_required(step, field, &draft));
            }
        }
    }
}
