//! The quote draft and its choice enums
//!
//! A [`QuoteDraft`] is the in-progress aggregate of answers owned by one
//! wizard session. Choice fields are modeled as enums carrying two spellings:
//! the code the quote backend expects on the wire (`"1"`, `"GBA Zona Norte"`,
//! `"D"`) and a stable upper-case name used by the session API
//! (`"SELF_PARTNER"`, `"GBA_NORTH"`). Either spelling parses.

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::CoreError;

/// Default age of the primary holder when the wizard opens
pub const DEFAULT_PRIMARY_AGE: i64 = 18;

/// A closed set of choices with wire codes and display labels
pub trait CodedEnum: Sized + Copy + 'static {
    /// Human-readable name of the choice set, used in error messages
    const KIND: &'static str;
    /// Every variant, in display order
    const ALL: &'static [Self];

    /// Code sent to the quote backend
    fn code(&self) -> &'static str;
    /// Stable upper-case name used by the session API
    fn name(&self) -> &'static str;
    /// Label shown next to the option
    fn label(&self) -> &'static str;

    /// Parses either the wire code or the name, ignoring ASCII case
    fn parse_code(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.code().eq_ignore_ascii_case(raw) || v.name().eq_ignore_ascii_case(raw))
            .ok_or_else(|| CoreError::unknown_code(Self::KIND, raw))
    }
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $api_name:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $api_name)]
                $variant,
            )+
        }

        impl CodedEnum for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $api_name),+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as CodedEnum>::parse_code(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

coded_enum! {
    /// Who the plan is for
    HouseholdGroup, "household group" {
        SelfOnly => ("1", "SELF", "Just me"),
        SelfPartner => ("2", "SELF_PARTNER", "Me and my partner"),
        SelfChildren => ("3", "SELF_CHILDREN", "Me and my child(ren)"),
        SelfPartnerChildren => ("4", "SELF_PARTNER_CHILDREN", "Me, my partner and my child(ren)"),
    }
}

coded_enum! {
    /// Where the household lives
    ResidenceZone, "residence zone" {
        Caba => ("CABA", "CABA", "CABA"),
        GbaNorth => ("GBA Zona Norte", "GBA_NORTH", "GBA North"),
        GbaSouth => ("GBA Zona Sur", "GBA_SOUTH", "GBA South"),
        GbaWest => ("GBA Zona Oeste", "GBA_WEST", "GBA West"),
    }
}

coded_enum! {
    /// How the primary holder would join the plan
    EnrollmentType, "enrollment type" {
        Private => ("P", "PRIVATE", "Private"),
        /// Salary contributions are redirected from the social insurance fund
        EmployeeWithSocialInsurance => ("D", "EMPLOYEE_WITH_SOCIAL_INSURANCE", "Employee with social insurance"),
    }
}

coded_enum! {
    /// How the customer wants to be contacted
    ContactMethod, "contact method" {
        Whatsapp => ("whatsapp", "WHATSAPP", "WhatsApp"),
        Call => ("llamada", "CALL", "Call"),
    }
}

impl HouseholdGroup {
    pub fn includes_partner(&self) -> bool {
        matches!(self, HouseholdGroup::SelfPartner | HouseholdGroup::SelfPartnerChildren)
    }

    pub fn includes_children(&self) -> bool {
        matches!(self, HouseholdGroup::SelfChildren | HouseholdGroup::SelfPartnerChildren)
    }
}

/// Contact details collected on the last input step
///
/// Nothing here blocks submission. The `validator` rules only feed the
/// non-blocking warnings shown next to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[validate(length(min = 1, message = "Full name is empty"))]
    pub full_name: String,
    #[validate(email(message = "Email address does not look valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Phone number looks too short"))]
    pub phone: String,
    pub region: String,
    pub preferred_contact_method: Option<ContactMethod>,
}

/// A non-blocking remark about the contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactWarning {
    pub field: String,
    pub message: String,
}

impl ContactDetails {
    /// Returns the warnings for the current contact details, sorted by field
    pub fn warnings(&self) -> Vec<ContactWarning> {
        let mut warnings = Vec::new();

        if let Err(errors) = self.validate() {
            for (field, field_errors) in errors.field_errors() {
                for error in field_errors.iter() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    warnings.push(ContactWarning {
                        field: format!("contact.{}", camel_case(&field.to_string())),
                        message,
                    });
                }
            }
        }

        if self.preferred_contact_method.is_none() {
            warnings.push(ContactWarning {
                field: "contact.preferredContactMethod".to_string(),
                message: "No preferred contact method chosen".to_string(),
            });
        }

        warnings.sort_by(|a, b| a.field.cmp(&b.field));
        warnings
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// The in-progress quote request
///
/// Integer fields hold whatever the lenient parser produced; range checks
/// belong to the input widgets and to the step decision table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    pub household_group: Option<HouseholdGroup>,
    pub residence_zone: Option<ResidenceZone>,
    pub primary_age: i64,
    pub partner_age: i64,
    pub child_count: i64,
    pub first_child_age: i64,
    pub enrollment_type: Option<EnrollmentType>,
    pub gross_salary: i64,
    pub contact: ContactDetails,
    /// Not editable; carried into the payload as-is
    pub agreed_to_terms: bool,
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self {
            household_group: None,
            residence_zone: None,
            primary_age: DEFAULT_PRIMARY_AGE,
            partner_age: 0,
            child_count: 0,
            first_child_age: 0,
            enrollment_type: None,
            gross_salary: 0,
            contact: ContactDetails::default(),
            agreed_to_terms: true,
        }
    }
}

impl QuoteDraft {
    /// True when the chosen group has a partner; false while unset
    pub fn includes_partner(&self) -> bool {
        self.household_group.map_or(false, |g| g.includes_partner())
    }

    /// True when the chosen group has children; false while unset
    pub fn includes_children(&self) -> bool {
        self.household_group.map_or(false, |g| g.includes_children())
    }

    /// True when the group has children and at least one was declared
    pub fn has_declared_children(&self) -> bool {
        self.includes_children() && self.child_count > 0
    }

    pub fn is_salaried(&self) -> bool {
        self.enrollment_type == Some(EnrollmentType::EmployeeWithSocialInsurance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft() {
        let draft = QuoteDraft::default();
        assert_eq!(draft.primary_age, 18);
        assert_eq!(draft.partner_age, 0);
        assert!(draft.household_group.is_none());
        assert!(draft.agreed_to_terms);
        assert_eq!(draft.contact, ContactDetails::default());
    }

    #[test]
    fn test_parse_accepts_code_and_name() {
        assert_eq!("2".parse::<HouseholdGroup>().unwrap(), HouseholdGroup::SelfPartner);
        assert_eq!("self_partner".parse::<HouseholdGroup>().unwrap(), HouseholdGroup::SelfPartner);
        assert_eq!("GBA Zona Sur".parse::<ResidenceZone>().unwrap(), ResidenceZone::GbaSouth);
        assert_eq!("D".parse::<EnrollmentType>().unwrap(), EnrollmentType::EmployeeWithSocialInsurance);
        assert_eq!("llamada".parse::<ContactMethod>().unwrap(), ContactMethod::Call);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "Mendoza".parse::<ResidenceZone>().unwrap_err();
        assert!(err.to_string().contains("residence zone"));
    }

    #[test]
    fn test_group_membership() {
        assert!(!HouseholdGroup::SelfOnly.includes_partner());
        assert!(HouseholdGroup::SelfPartner.includes_partner());
        assert!(!HouseholdGroup::SelfPartner.includes_children());
        assert!(HouseholdGroup::SelfChildren.includes_children());
        assert!(HouseholdGroup::SelfPartnerChildren.includes_partner());
        assert!(HouseholdGroup::SelfPartnerChildren.includes_children());
    }

    #[test]
    fn test_api_serialization_uses_names() {
        let json = serde_json::to_string(&ResidenceZone::GbaWest).unwrap();
        assert_eq!(json, "\"GBA_WEST\"");
    }

    #[test]
    fn test_contact_warnings() {
        let empty = ContactDetails::default();
        let fields: Vec<_> = empty.warnings().into_iter().map(|w| w.field).collect();
        assert!(fields.contains(&"contact.fullName".to_string()));
        assert!(fields.contains(&"contact.email".to_string()));
        assert!(fields.contains(&"contact.phone".to_string()));
        assert!(fields.contains(&"contact.preferredContactMethod".to_string()));

        let complete = ContactDetails {
            full_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "1144445555".to_string(),
            region: String::new(),
            preferred_contact_method: Some(ContactMethod::Whatsapp),
        };
        assert!(complete.warnings().is_empty());
    }
}
