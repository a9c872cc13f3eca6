//! Field paths and lenient input parsing
//!
//! Every editable value of a [`QuoteDraft`] is addressed by a [`FieldPath`].
//! Raw input arrives as text from an input control; integer fields never
//! reject input, they fall back to a per-field default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::CoreError;

use crate::draft::{
    CodedEnum, ContactMethod, EnrollmentType, HouseholdGroup, QuoteDraft, ResidenceZone,
    DEFAULT_PRIMARY_AGE,
};

/// Address of an editable draft field
///
/// `agreedToTerms` has no path: it is not user-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPath {
    #[serde(rename = "householdGroup")]
    HouseholdGroup,
    #[serde(rename = "residenceZone")]
    ResidenceZone,
    #[serde(rename = "primaryAge")]
    PrimaryAge,
    #[serde(rename = "partnerAge")]
    PartnerAge,
    #[serde(rename = "childCount")]
    ChildCount,
    #[serde(rename = "firstChildAge")]
    FirstChildAge,
    #[serde(rename = "enrollmentType")]
    EnrollmentType,
    #[serde(rename = "grossSalary")]
    GrossSalary,
    #[serde(rename = "contact.fullName")]
    ContactFullName,
    #[serde(rename = "contact.email")]
    ContactEmail,
    #[serde(rename = "contact.phone")]
    ContactPhone,
    #[serde(rename = "contact.region")]
    ContactRegion,
    #[serde(rename = "contact.preferredContactMethod")]
    ContactMethod,
}

/// How a field is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// Integer input with the widget's declared range
    Integer {
        default: i64,
        min: i64,
        max: Option<i64>,
    },
    Choice,
    Text,
}

/// The current value of a field, as shown to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    /// Name of the chosen option, `None` while unset
    Choice(Option<String>),
    Text(String),
}

impl FieldPath {
    pub const ALL: [FieldPath; 13] = [
        FieldPath::HouseholdGroup,
        FieldPath::ResidenceZone,
        FieldPath::PrimaryAge,
        FieldPath::PartnerAge,
        FieldPath::ChildCount,
        FieldPath::FirstChildAge,
        FieldPath::EnrollmentType,
        FieldPath::GrossSalary,
        FieldPath::ContactFullName,
        FieldPath::ContactEmail,
        FieldPath::ContactPhone,
        FieldPath::ContactRegion,
        FieldPath::ContactMethod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::HouseholdGroup => "householdGroup",
            FieldPath::ResidenceZone => "residenceZone",
            FieldPath::PrimaryAge => "primaryAge",
            FieldPath::PartnerAge => "partnerAge",
            FieldPath::ChildCount => "childCount",
            FieldPath::FirstChildAge => "firstChildAge",
            FieldPath::EnrollmentType => "enrollmentType",
            FieldPath::GrossSalary => "grossSalary",
            FieldPath::ContactFullName => "contact.fullName",
            FieldPath::ContactEmail => "contact.email",
            FieldPath::ContactPhone => "contact.phone",
            FieldPath::ContactRegion => "contact.region",
            FieldPath::ContactMethod => "contact.preferredContactMethod",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldPath::HouseholdGroup => "The plan is for",
            FieldPath::ResidenceZone => "We live in the zone of",
            FieldPath::PrimaryAge => "Primary holder's age",
            FieldPath::PartnerAge => "My partner's age",
            FieldPath::ChildCount => "Number of children",
            FieldPath::FirstChildAge => "Age of the first child",
            FieldPath::EnrollmentType => "I would join the plan as",
            FieldPath::GrossSalary => "My gross salary is around",
            FieldPath::ContactFullName => "Full name",
            FieldPath::ContactEmail => "Email",
            FieldPath::ContactPhone => "Phone",
            FieldPath::ContactRegion => "Region",
            FieldPath::ContactMethod => "Preferred contact method",
        }
    }

    /// The input kind and, for integers, the widget range and parse fallback
    pub fn input_kind(&self) -> InputKind {
        match self {
            FieldPath::PrimaryAge => InputKind::Integer {
                default: DEFAULT_PRIMARY_AGE,
                min: 18,
                max: Some(100),
            },
            FieldPath::PartnerAge => InputKind::Integer { default: 0, min: 18, max: Some(100) },
            FieldPath::ChildCount => InputKind::Integer { default: 0, min: 0, max: Some(10) },
            FieldPath::FirstChildAge => InputKind::Integer { default: 0, min: 0, max: Some(25) },
            FieldPath::GrossSalary => InputKind::Integer { default: 0, min: 0, max: None },
            FieldPath::HouseholdGroup
            | FieldPath::ResidenceZone
            | FieldPath::EnrollmentType
            | FieldPath::ContactMethod => InputKind::Choice,
            FieldPath::ContactFullName
            | FieldPath::ContactEmail
            | FieldPath::ContactPhone
            | FieldPath::ContactRegion => InputKind::Text,
        }
    }

    /// Options for choice fields, as `(name, label)` pairs
    pub fn options(&self) -> Vec<(&'static str, &'static str)> {
        fn all<T: CodedEnum>() -> Vec<(&'static str, &'static str)> {
            T::ALL.iter().map(|v| (v.name(), v.label())).collect()
        }

        match self {
            FieldPath::HouseholdGroup => all::<HouseholdGroup>(),
            FieldPath::ResidenceZone => all::<ResidenceZone>(),
            FieldPath::EnrollmentType => all::<EnrollmentType>(),
            FieldPath::ContactMethod => all::<ContactMethod>(),
            _ => Vec::new(),
        }
    }

    /// Reads the field's current value out of a draft
    pub fn read(&self, draft: &QuoteDraft) -> FieldValue {
        fn choice<T: CodedEnum>(value: Option<T>) -> FieldValue {
            FieldValue::Choice(value.map(|v| v.name().to_string()))
        }

        match self {
            FieldPath::HouseholdGroup => choice(draft.household_group),
            FieldPath::ResidenceZone => choice(draft.residence_zone),
            FieldPath::PrimaryAge => FieldValue::Integer(draft.primary_age),
            FieldPath::PartnerAge => FieldValue::Integer(draft.partner_age),
            FieldPath::ChildCount => FieldValue::Integer(draft.child_count),
            FieldPath::FirstChildAge => FieldValue::Integer(draft.first_child_age),
            FieldPath::EnrollmentType => choice(draft.enrollment_type),
            FieldPath::GrossSalary => FieldValue::Integer(draft.gross_salary),
            FieldPath::ContactFullName => FieldValue::Text(draft.contact.full_name.clone()),
            FieldPath::ContactEmail => FieldValue::Text(draft.contact.email.clone()),
            FieldPath::ContactPhone => FieldValue::Text(draft.contact.phone.clone()),
            FieldPath::ContactRegion => FieldValue::Text(draft.contact.region.clone()),
            FieldPath::ContactMethod => choice(draft.contact.preferred_contact_method),
        }
    }

    /// Writes a raw input value into the draft
    ///
    /// Integer fields fall back to their default when the input does not
    /// parse. Choice fields are cleared when the input names no option.
    pub fn write(&self, draft: &mut QuoteDraft, raw: &str) {
        let integer = |default: i64| parse_integer_or(raw, default);

        match self {
            FieldPath::HouseholdGroup => draft.household_group = HouseholdGroup::parse_code(raw).ok(),
            FieldPath::ResidenceZone => draft.residence_zone = ResidenceZone::parse_code(raw).ok(),
            FieldPath::PrimaryAge => draft.primary_age = integer(DEFAULT_PRIMARY_AGE),
            FieldPath::PartnerAge => draft.partner_age = integer(0),
            FieldPath::ChildCount => draft.child_count = integer(0),
            FieldPath::FirstChildAge => draft.first_child_age = integer(0),
            FieldPath::EnrollmentType => draft.enrollment_type = EnrollmentType::parse_code(raw).ok(),
            FieldPath::GrossSalary => draft.gross_salary = integer(0),
            FieldPath::ContactFullName => draft.contact.full_name = raw.to_string(),
            FieldPath::ContactEmail => draft.contact.email = raw.to_string(),
            FieldPath::ContactPhone => draft.contact.phone = raw.to_string(),
            FieldPath::ContactRegion => draft.contact.region = raw.to_string(),
            FieldPath::ContactMethod => {
                draft.contact.preferred_contact_method = ContactMethod::parse_code(raw).ok()
            }
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FieldPath::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::unknown_code("field path", s))
    }
}

/// Parses the leading integer of `raw`, or returns `default`
///
/// Leading whitespace and a sign are accepted and trailing garbage is
/// ignored, so `"42 years"` reads as 42 and `"3.7"` as 3. Input with no
/// leading digits, or digits that overflow, yields `default`.
pub fn parse_integer_or(raw: &str, default: i64) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        return default;
    }

    match digits[..end].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_or() {
        assert_eq!(parse_integer_or("30", 18), 30);
        assert_eq!(parse_integer_or("  42 years", 0), 42);
        assert_eq!(parse_integer_or("3.7", 0), 3);
        assert_eq!(parse_integer_or("-5", 0), -5);
        assert_eq!(parse_integer_or("abc", 18), 18);
        assert_eq!(parse_integer_or("", 0), 0);
        assert_eq!(parse_integer_or("-", 7), 7);
        assert_eq!(parse_integer_or("99999999999999999999", 0), 0);
    }

    #[test]
    fn test_path_round_trip_through_str() {
        for path in FieldPath::ALL {
            assert_eq!(path.as_str().parse::<FieldPath>().unwrap(), path);
        }
        assert!("agreedToTerms".parse::<FieldPath>().is_err());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for path in FieldPath::ALL {
            let json = serde_json::to_string(&path).unwrap();
            assert_eq!(json, format!("\"{}\"", path.as_str()));
        }
    }

    #[test]
    fn test_write_numeric_fallbacks() {
        let mut draft = QuoteDraft::default();
        FieldPath::PrimaryAge.write(&mut draft, "forty");
        assert_eq!(draft.primary_age, 18);
        FieldPath::GrossSalary.write(&mut draft, "lots");
        assert_eq!(draft.gross_salary, 0);
    }

    #[test]
    fn test_write_unknown_choice_clears() {
        let mut draft = QuoteDraft::default();
        FieldPath::ResidenceZone.write(&mut draft, "GBA_NORTH");
        assert_eq!(draft.residence_zone, Some(ResidenceZone::GbaNorth));
        FieldPath::ResidenceZone.write(&mut draft, "Atlantis");
        assert_eq!(draft.residence_zone, None);
    }

    #[test]
    fn test_read_choice_uses_name() {
        let mut draft = QuoteDraft::default();
        FieldPath::HouseholdGroup.write(&mut draft, "4");
        assert_eq!(
            FieldPath::HouseholdGroup.read(&draft),
            FieldValue::Choice(Some("SELF_PARTNER_CHILDREN".to_string()))
        );
    }
}
