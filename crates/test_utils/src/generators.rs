//! Property-Based Test Generators
//!
//! Proptest strategies for wizard inputs, plus `fake`-backed contact data.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use proptest::prelude::*;

use domain_quote::{
    CodedEnum, ContactDetails, ContactMethod, EnrollmentType, HouseholdGroup, QuoteDraft,
    ResidenceZone,
};

fn coded<T: CodedEnum + std::fmt::Debug + 'static>() -> impl Strategy<Value = T> {
    proptest::sample::select(T::ALL.to_vec())
}

pub fn household_group_strategy() -> impl Strategy<Value = HouseholdGroup> {
    coded()
}

pub fn residence_zone_strategy() -> impl Strategy<Value = ResidenceZone> {
    coded()
}

pub fn enrollment_type_strategy() -> impl Strategy<Value = EnrollmentType> {
    coded()
}

pub fn contact_method_strategy() -> impl Strategy<Value = ContactMethod> {
    coded()
}

/// Groups without a partner
pub fn solo_group_strategy() -> impl Strategy<Value = HouseholdGroup> {
    household_group_strategy().prop_filter("no partner", |g| !g.includes_partner())
}

/// Text an input control could hold that never parses as an integer
pub fn non_numeric_input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("-".to_string()),
        "[a-zA-Z][a-zA-Z0-9 ]{0,11}",
        "[ ]{0,3}[.,][0-9]{1,3}",
    ]
}

/// Ages inside the declared adult range
pub fn adult_age_strategy() -> impl Strategy<Value = i64> {
    18i64..=100
}

/// A draft whose step 1-3 requirements all hold
pub fn complete_draft_strategy() -> impl Strategy<Value = QuoteDraft> {
    (
        household_group_strategy(),
        residence_zone_strategy(),
        enrollment_type_strategy(),
        adult_age_strategy(),
        adult_age_strategy(),
        0i64..=10,
        0i64..=25,
        0i64..5_000_000,
    )
        .prop_map(
            |(group, zone, enrollment, primary_age, partner_age, child_count, child_age, salary)| {
                QuoteDraft {
                    household_group: Some(group),
                    residence_zone: Some(zone),
                    primary_age,
                    partner_age,
                    child_count,
                    first_child_age: child_age,
                    enrollment_type: Some(enrollment),
                    gross_salary: salary,
                    ..Default::default()
                }
            },
        )
}

/// Plausible contact details from `fake`
pub fn fake_contact() -> ContactDetails {
    ContactDetails {
        full_name: Name().fake(),
        email: SafeEmail().fake(),
        phone: PhoneNumber().fake(),
        region: String::new(),
        preferred_contact_method: Some(ContactMethod::Whatsapp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_quote::parse_integer_or;

    proptest! {
        #[test]
        fn non_numeric_inputs_never_parse(raw in non_numeric_input_strategy()) {
            prop_assert_eq!(parse_integer_or(&raw, -7), -7);
        }

        #[test]
        fn solo_groups_exclude_partner(group in solo_group_strategy()) {
            prop_assert!(!group.includes_partner());
        }
    }

    #[test]
    fn test_fake_contact_has_no_warnings_for_email() {
        let contact = fake_contact();
        assert!(contact
            .warnings()
            .iter()
            .all(|w| w.field != "contact.email"));
    }
}
