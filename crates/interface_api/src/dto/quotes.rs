//! Quote session DTOs

use serde::{Deserialize, Serialize};

use domain_quote::{StepView, SubmissionReceipt};

/// One edited input, as the form control reports it
#[derive(Debug, Clone, Deserialize)]
pub struct FieldUpdate {
    /// Dotted field path, e.g. `primaryAge` or `contact.email`
    pub path: String,
    /// Raw value; numbers and booleans are accepted and stringified
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FieldUpdate {
    /// The value as the text an input control would hold
    pub fn raw_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Body of `PUT /api/v1/quotes/:id/fields`; updates apply in order
#[derive(Debug, Clone, Deserialize)]
pub struct SetFieldsRequest {
    pub fields: Vec<FieldUpdate>,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub view: StepView,
    /// Present when this advance submitted the quote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<SubmissionReceipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_from_json() {
        let update: FieldUpdate =
            serde_json::from_value(serde_json::json!({ "path": "primaryAge", "value": 42 })).unwrap();
        assert_eq!(update.raw_value(), "42");

        let update: FieldUpdate =
            serde_json::from_value(serde_json::json!({ "path": "contact.fullName" })).unwrap();
        assert_eq!(update.raw_value(), "");
    }
}
