//! Submission payload
//!
//! The payload is a snapshot of the whole draft in the shape the quote
//! backend expects: Spanish field names, choice fields as their wire codes
//! (an unset choice is an empty string), and a social-insurance contribution
//! slot the backend reads but the wizard never asks for.

use serde::{Deserialize, Serialize};

use crate::draft::{ContactMethod, EnrollmentType, HouseholdGroup, QuoteDraft, ResidenceZone};

/// Body of the quote submission request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "group", with = "wire_code")]
    pub group: Option<HouseholdGroup>,
    #[serde(rename = "edad_1")]
    pub primary_age: i64,
    #[serde(rename = "edad_2")]
    pub partner_age: i64,
    #[serde(rename = "cantidadDeHijos")]
    pub child_count: i64,
    #[serde(rename = "edadHijo1")]
    pub first_child_age: i64,
    #[serde(rename = "residencia", with = "wire_code")]
    pub residence_zone: Option<ResidenceZone>,
    #[serde(rename = "tipo", with = "wire_code")]
    pub enrollment_type: Option<EnrollmentType>,
    #[serde(rename = "agree")]
    pub agreed_to_terms: bool,
    #[serde(rename = "aporteOS")]
    pub social_insurance_contribution: i64,
    #[serde(rename = "sueldo")]
    pub gross_salary: i64,
    #[serde(rename = "personalData")]
    pub contact: WireContact,
}

/// Contact block of the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireContact {
    #[serde(rename = "name")]
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub region: String,
    #[serde(rename = "medioContacto", with = "wire_code")]
    pub preferred_contact_method: Option<ContactMethod>,
}

impl SubmissionPayload {
    /// Copies every draft value, relevant to the chosen branch or not
    pub fn from_draft(draft: &QuoteDraft) -> Self {
        Self {
            group: draft.household_group,
            primary_age: draft.primary_age,
            partner_age: draft.partner_age,
            child_count: draft.child_count,
            first_child_age: draft.first_child_age,
            residence_zone: draft.residence_zone,
            enrollment_type: draft.enrollment_type,
            agreed_to_terms: draft.agreed_to_terms,
            social_insurance_contribution: 0,
            gross_salary: draft.gross_salary,
            contact: WireContact {
                full_name: draft.contact.full_name.clone(),
                email: draft.contact.email.clone(),
                phone: draft.contact.phone.clone(),
                region: draft.contact.region.clone(),
                preferred_contact_method: draft.contact.preferred_contact_method,
            },
        }
    }
}

impl From<&QuoteDraft> for SubmissionPayload {
    fn from(draft: &QuoteDraft) -> Self {
        SubmissionPayload::from_draft(draft)
    }
}

/// Serializes an optional choice as its wire code, `""` when unset
mod wire_code {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::draft::CodedEnum;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CodedEnum,
    {
        serializer.serialize_str(value.as_ref().map(|v| v.code()).unwrap_or(""))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: CodedEnum,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        T::parse_code(&raw).map(Some).map_err(serde::de::Error::custom)
    }
}
