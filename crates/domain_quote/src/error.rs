//! Quote wizard errors
//!
//! Validation failures keep the user on the current step, submission
//! failures keep the user on the contact step with all data intact. Neither
//! is fatal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{CoreError, PortError};

use crate::field::FieldPath;
use crate::step::Step;

/// A required field of the current step is missing or out of domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} ({field} on {step})")]
pub struct ValidationError {
    pub step: Step,
    pub field: FieldPath,
    pub message: String,
}

/// The submission collaborator reported failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Quote submission failed: {detail}")]
pub struct SubmissionError {
    /// Message for the customer
    pub message: String,
    /// Technical detail from the port
    pub detail: String,
    /// HTTP status when the backend answered
    pub status: Option<u16>,
    /// Whether the backend could not be reached at all
    pub transport: bool,
}

impl SubmissionError {
    pub fn from_port(error: &PortError) -> Self {
        let status = match error {
            PortError::Rejected { status, .. } => Some(*status),
            _ => None,
        };
        let transport = error.is_transport();
        let message = if transport {
            "Could not connect to the server"
        } else {
            "There was a problem sending your quote"
        };

        Self {
            message: message.to_string(),
            detail: error.to_string(),
            status,
            transport,
        }
    }
}

/// The last error shown to the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayedError {
    Validation(ValidationError),
    Submission(SubmissionError),
}

impl DisplayedError {
    pub fn message(&self) -> &str {
        match self {
            DisplayedError::Validation(e) => &e.message,
            DisplayedError::Submission(e) => &e.message,
        }
    }
}

/// Errors returned by wizard operations
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// A submission is outstanding; the wizard is read-only until it resolves
    #[error("A quote submission is already in progress")]
    SubmissionInFlight,

    /// A submission result arrived for an attempt the wizard no longer tracks
    #[error("Submission attempt {0} is no longer pending")]
    StaleSubmission(u64),

    #[error("Invalid step transition: {0}")]
    InvalidTransition(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl QuoteError {
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        QuoteError::InvalidTransition(message.into())
    }

    /// True for errors the customer recovers from by editing or retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuoteError::Validation(_) | QuoteError::Submission(_) | QuoteError::SubmissionInFlight
        )
    }
}
