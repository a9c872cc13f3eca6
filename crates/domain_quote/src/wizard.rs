//! Wizard controller
//!
//! The controller owns the step cursor and the draft of one session. Edits
//! are applied without validation; validation runs when the customer asks to
//! advance, against the decision table in [`crate::requirements`].
//!
//! Submission is split in two halves so a host that keeps the controller
//! behind a lock does not hold it across the network call:
//!
//! ```rust,ignore
//! let pending = { session.lock().await.begin_submission()? };
//! let outcome = submitter.submit_quote(&pending.payload, Some(pending.metadata())).await;
//! session.lock().await.complete_submission(pending.attempt, outcome)?;
//! ```
//!
//! While a submission is outstanding the controller refuses edits, step
//! changes and a second submission. Dropping an `advance` or `submit`
//! future mid-call abandons the attempt; hosts driving the split form must
//! either see the outcome through or call
//! [`abandon_submission`](WizardController::abandon_submission).

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use core_kernel::{OperationMetadata, PortError, QuoteSessionId};

use crate::draft::QuoteDraft;
use crate::error::{DisplayedError, QuoteError, SubmissionError};
use crate::field::FieldPath;
use crate::notify::{Notification, Notifier};
use crate::payload::SubmissionPayload;
use crate::ports::{QuoteSubmissionPort, SubmissionReceipt};
use crate::requirements::validate_step;
use crate::step::Step;
use crate::view::StepView;

/// A submission that has been started and awaits its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub session_id: QuoteSessionId,
    pub attempt: u64,
    pub payload: SubmissionPayload,
}

impl PendingSubmission {
    /// Metadata forwarded to the submission port
    pub fn metadata(&self) -> OperationMetadata {
        OperationMetadata::with_correlation_id(self.session_id.to_string())
            .with_context("attempt", self.attempt.to_string())
    }
}

/// Result of a validated advance request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The cursor moved to this step
    Moved(Step),
    /// The contact step validated; the payload must now be submitted
    Submit(PendingSubmission),
}

/// Controller for one quote wizard session
pub struct WizardController {
    session_id: QuoteSessionId,
    step: Step,
    draft: QuoteDraft,
    last_error: Option<DisplayedError>,
    pending: Option<u64>,
    attempts: u64,
    submitter: Arc<dyn QuoteSubmissionPort>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("session_id", &self.session_id)
            .field("step", &self.step)
            .field("draft", &self.draft)
            .field("last_error", &self.last_error)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl WizardController {
    /// Opens a wizard on step 1 with a default draft
    pub fn new(submitter: Arc<dyn QuoteSubmissionPort>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_session_id(QuoteSessionId::new_v7(), submitter, notifier)
    }

    pub fn with_session_id(
        session_id: QuoteSessionId,
        submitter: Arc<dyn QuoteSubmissionPort>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session_id,
            step: Step::HouseholdAndZone,
            draft: QuoteDraft::default(),
            last_error: None,
            pending: None,
            attempts: 0,
            submitter,
            notifier,
        }
    }

    pub fn session_id(&self) -> QuoteSessionId {
        self.session_id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    pub fn last_error(&self) -> Option<&DisplayedError> {
        self.last_error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// The port this session submits through
    pub fn submitter(&self) -> Arc<dyn QuoteSubmissionPort> {
        Arc::clone(&self.submitter)
    }

    /// Snapshot of the current step for the presentation layer
    pub fn view(&self) -> StepView {
        StepView::build(
            self.session_id,
            self.step,
            &self.draft,
            self.is_submitting(),
            self.last_error.clone(),
        )
    }

    /// Stores a raw input value; integers that do not parse take the field default
    pub fn set_field(&mut self, field: FieldPath, raw: &str) -> Result<(), QuoteError> {
        self.ensure_idle()?;
        if self.step.is_terminal() {
            return Err(QuoteError::invalid_transition(
                "The quote has been submitted; reset the wizard to edit it",
            ));
        }

        field.write(&mut self.draft, raw);
        debug!(session_id = %self.session_id, field = %field, "Draft field updated");
        Ok(())
    }

    /// Like [`set_field`](Self::set_field) with a textual path such as `contact.email`
    pub fn set_field_path(&mut self, path: &str, raw: &str) -> Result<(), QuoteError> {
        let field: FieldPath = path.parse()?;
        self.set_field(field, raw)
    }

    /// Validates the current step and moves forward
    ///
    /// From the contact step this submits the quote and only lands on the
    /// success screen once the port confirms.
    pub async fn advance(&mut self) -> Result<Step, QuoteError> {
        match self.try_advance()? {
            Advance::Moved(step) => Ok(step),
            Advance::Submit(pending) => {
                self.run_submission(pending).await?;
                Ok(self.step)
            }
        }
    }

    /// Synchronous half of [`advance`](Self::advance)
    ///
    /// Returns `Advance::Submit` from the contact step; the caller must
    /// deliver the payload and report back through
    /// [`complete_submission`](Self::complete_submission).
    pub fn try_advance(&mut self) -> Result<Advance, QuoteError> {
        self.ensure_idle()?;
        let next = self.step.next().ok_or_else(|| {
            QuoteError::invalid_transition("The quote has already been submitted")
        })?;
        self.validate_current()?;

        if self.step.submits() {
            return Ok(Advance::Submit(self.start_submission()));
        }

        info!(session_id = %self.session_id, from = %self.step, to = %next, "Wizard advanced");
        self.step = next;
        self.last_error = None;
        Ok(Advance::Moved(next))
    }

    /// Submits the quote from the contact step
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, QuoteError> {
        let pending = self.begin_submission()?;
        self.run_submission(pending).await
    }

    /// Starts a submission from the contact step and marks it in flight
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, QuoteError> {
        self.ensure_idle()?;
        if !self.step.submits() {
            return Err(QuoteError::invalid_transition(format!(
                "Cannot submit from {}",
                self.step
            )));
        }
        self.validate_current()?;
        Ok(self.start_submission())
    }

    /// Applies the outcome of a submission started by this controller
    ///
    /// Outcomes for an attempt that is no longer pending (the wizard was
    /// reset meanwhile) are ignored and reported as `StaleSubmission`.
    pub fn complete_submission(
        &mut self,
        attempt: u64,
        outcome: Result<SubmissionReceipt, PortError>,
    ) -> Result<SubmissionReceipt, QuoteError> {
        if self.pending != Some(attempt) {
            debug!(session_id = %self.session_id, attempt, "Ignoring stale submission outcome");
            return Err(QuoteError::StaleSubmission(attempt));
        }
        self.pending = None;

        match outcome {
            Ok(receipt) => {
                info!(
                    session_id = %self.session_id,
                    submission_id = %receipt.submission_id,
                    attempt,
                    "Quote submitted"
                );
                self.step = Step::Completed;
                self.last_error = None;
                Ok(receipt)
            }
            Err(port_error) => {
                let error = SubmissionError::from_port(&port_error);
                warn!(
                    session_id = %self.session_id,
                    attempt,
                    error = %port_error,
                    "Quote submission failed"
                );
                self.notifier
                    .notify(Notification::error(self.session_id, error.message.clone()).retryable());
                self.last_error = Some(DisplayedError::Submission(error.clone()));
                Err(error.into())
            }
        }
    }

    /// Releases a submission whose outcome will never arrive
    ///
    /// Used when the caller stops waiting for the port. The draft and step
    /// are kept so the customer can retry. Returns false when `attempt` is
    /// no longer the pending one.
    pub fn abandon_submission(&mut self, attempt: u64) -> bool {
        if self.pending != Some(attempt) {
            return false;
        }
        self.pending = None;
        warn!(session_id = %self.session_id, attempt, "Submission abandoned before completion");
        true
    }

    /// Moves back one step without validation; step 1 is the floor
    pub fn retreat(&mut self) -> Result<Step, QuoteError> {
        self.ensure_idle()?;
        if self.step.is_terminal() {
            return Err(QuoteError::invalid_transition(
                "The quote has been submitted; reset the wizard to start over",
            ));
        }

        let previous = self.step.previous();
        debug!(session_id = %self.session_id, from = %self.step, to = %previous, "Wizard retreated");
        self.step = previous;
        self.last_error = None;
        Ok(previous)
    }

    /// Restores the default draft and returns to step 1
    ///
    /// An outstanding submission is abandoned; its outcome will be ignored.
    pub fn reset(&mut self) {
        if let Some(attempt) = self.pending.take() {
            debug!(session_id = %self.session_id, attempt, "Abandoning in-flight submission");
        }
        self.draft = QuoteDraft::default();
        self.step = Step::HouseholdAndZone;
        self.last_error = None;
        info!(session_id = %self.session_id, "Wizard reset");
    }

    fn ensure_idle(&self) -> Result<(), QuoteError> {
        if self.pending.is_some() {
            return Err(QuoteError::SubmissionInFlight);
        }
        Ok(())
    }

    fn validate_current(&mut self) -> Result<(), QuoteError> {
        if let Err(error) = validate_step(self.step, &self.draft) {
            debug!(
                session_id = %self.session_id,
                step = %self.step,
                field = %error.field,
                "Step validation failed"
            );
            self.notifier
                .notify(Notification::error(self.session_id, error.message.clone()));
            self.last_error = Some(DisplayedError::Validation(error.clone()));
            return Err(error.into());
        }
        Ok(())
    }

    fn start_submission(&mut self) -> PendingSubmission {
        self.attempts += 1;
        self.pending = Some(self.attempts);
        debug!(session_id = %self.session_id, attempt = self.attempts, "Submission started");

        PendingSubmission {
            session_id: self.session_id,
            attempt: self.attempts,
            payload: SubmissionPayload::from_draft(&self.draft),
        }
    }

    async fn run_submission(&mut self, pending: PendingSubmission) -> Result<SubmissionReceipt, QuoteError> {
        let submitter = Arc::clone(&self.submitter);
        let mut guard = InFlight {
            wizard: self,
            attempt: pending.attempt,
            armed: true,
        };
        let outcome = submitter
            .submit_quote(&pending.payload, Some(pending.metadata()))
            .await;
        guard.armed = false;
        guard.wizard.complete_submission(pending.attempt, outcome)
    }
}

/// Abandons the attempt if the submitting future is dropped mid-call
struct InFlight<'a> {
    wizard: &'a mut WizardController,
    attempt: u64,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.wizard.abandon_submission(self.attempt);
        }
    }
}
