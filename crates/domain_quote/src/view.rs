//! Presentation snapshot of a wizard session

use serde::{Deserialize, Serialize};

use core_kernel::QuoteSessionId;

use crate::draft::{ContactWarning, QuoteDraft};
use crate::error::DisplayedError;
use crate::field::{FieldPath, FieldValue, InputKind};
use crate::requirements::{is_required, relevant_fields};
use crate::step::Step;

/// One selectable option of a choice field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// A field the presentation layer should render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub path: FieldPath,
    pub label: String,
    pub value: FieldValue,
    pub required: bool,
    pub input: InputKind,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<ChoiceOption>,
}

/// Everything needed to render the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    pub session_id: QuoteSessionId,
    pub step: Step,
    pub title: String,
    pub fields: Vec<FieldView>,
    pub can_retreat: bool,
    /// False while a submission is outstanding or on the success screen
    pub can_advance: bool,
    pub submits_on_advance: bool,
    pub is_submitting: bool,
    pub last_error: Option<DisplayedError>,
    /// Non-blocking remarks, only on the contact step
    pub warnings: Vec<ContactWarning>,
}

impl StepView {
    pub(crate) fn build(
        session_id: QuoteSessionId,
        step: Step,
        draft: &QuoteDraft,
        is_submitting: bool,
        last_error: Option<DisplayedError>,
    ) -> Self {
        let fields = relevant_fields(step, draft)
            .into_iter()
            .map(|path| FieldView {
                path,
                label: path.label().to_string(),
                value: path.read(draft),
                required: is_required(step, path, draft),
                input: path.input_kind(),
                options: path
                    .options()
                    .into_iter()
                    .map(|(value, label)| ChoiceOption {
                        value: value.to_string(),
                        label: label.to_string(),
                    })
                    .collect(),
            })
            .collect();

        let warnings = if step == Step::Contact {
            draft.contact.warnings()
        } else {
            Vec::new()
        };

        Self {
            session_id,
            step,
            title: step.title().to_string(),
            fields,
            can_retreat: !is_submitting && step != Step::HouseholdAndZone && !step.is_terminal(),
            can_advance: !is_submitting && !step.is_terminal(),
            submits_on_advance: step.submits(),
            is_submitting,
            last_error,
            warnings,
        }
    }

    /// Looks up a rendered field by path
    pub fn field(&self, path: FieldPath) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.path == path)
    }
}
