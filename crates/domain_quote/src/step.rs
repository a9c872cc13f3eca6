//! Wizard steps

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::CoreError;

/// A wizard screen
///
/// Serialized as its 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    /// Household group and residence zone
    HouseholdAndZone = 1,
    Ages = 2,
    Enrollment = 3,
    /// Contact details; advancing from here submits the quote
    Contact = 4,
    /// Terminal success screen
    Completed = 5,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::HouseholdAndZone,
        Step::Ages,
        Step::Enrollment,
        Step::Contact,
        Step::Completed,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::HouseholdAndZone => "Who is the plan for",
            Step::Ages => "Our ages",
            Step::Enrollment => "How would you join",
            Step::Contact => "Personal details",
            Step::Completed => "Thank you",
        }
    }

    /// The step reached by a successful advance, `None` from the terminal step
    pub fn next(&self) -> Option<Step> {
        match self {
            Step::HouseholdAndZone => Some(Step::Ages),
            Step::Ages => Some(Step::Enrollment),
            Step::Enrollment => Some(Step::Contact),
            Step::Contact => Some(Step::Completed),
            Step::Completed => None,
        }
    }

    /// The step reached by retreating; the first step stays put
    pub fn previous(&self) -> Step {
        match self {
            Step::HouseholdAndZone | Step::Ages => Step::HouseholdAndZone,
            Step::Enrollment => Step::Ages,
            Step::Contact => Step::Enrollment,
            Step::Completed => Step::Contact,
        }
    }

    /// True for the step whose advance triggers submission
    pub fn submits(&self) -> bool {
        *self == Step::Contact
    }

    pub fn is_terminal(&self) -> bool {
        *self == Step::Completed
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::ALL
            .iter()
            .copied()
            .find(|s| s.number() == value)
            .ok_or_else(|| CoreError::validation(format!("No wizard step {}", value)))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}
