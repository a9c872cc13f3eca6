//! Quote Wizard Domain
//!
//! This crate implements the guided health-insurance quote request: a short,
//! branching sequence of steps that collects a [`QuoteDraft`], validates each
//! step against a single decision table, and hands the finished draft to a
//! [`QuoteSubmissionPort`].
//!
//! # Step Lifecycle
//!
//! ```text
//! HouseholdAndZone -> Ages -> Enrollment -> Contact --(submit ok)--> Completed
//!        ^             |          |            |                        |
//!        +--retreat----+----------+            +--(submit fails: stay)  |
//!        +-------------------------- reset ------------------------------+
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_quote::{WizardController, FieldPath, TracingNotifier};
//!
//! let mut wizard = WizardController::new(submitter, Arc::new(TracingNotifier));
//! wizard.set_field(FieldPath::HouseholdGroup, "SELF_PARTNER")?;
//! wizard.set_field(FieldPath::ResidenceZone, "CABA")?;
//! wizard.advance().await?;
//! ```

pub mod draft;
pub mod field;
pub mod step;
pub mod requirements;
pub mod error;
pub mod payload;
pub mod notify;
pub mod ports;
pub mod view;
pub mod wizard;

pub use draft::{
    QuoteDraft, ContactDetails, ContactWarning, CodedEnum,
    HouseholdGroup, ResidenceZone, EnrollmentType, ContactMethod,
};
pub use field::{FieldPath, FieldValue, InputKind, parse_integer_or};
pub use step::Step;
pub use requirements::{relevant_fields, required_fields, validate_step};
pub use error::{QuoteError, ValidationError, SubmissionError, DisplayedError};
pub use payload::{SubmissionPayload, WireContact};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier, ChannelNotifier};
#[cfg(any(test, feature = "mock"))]
pub use notify::RecordingNotifier;
pub use ports::{QuoteSubmissionPort, SubmissionReceipt};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockSubmissionPort;
pub use view::{StepView, FieldView, ChoiceOption};
pub use wizard::{WizardController, Advance, PendingSubmission};
