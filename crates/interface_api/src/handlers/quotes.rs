//! Quote session handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error, info};

use core_kernel::QuoteSessionId;
use domain_quote::{Advance, FieldPath, QuoteError, StepView};

use crate::dto::quotes::{AdvanceResponse, SetFieldsRequest};
use crate::sessions::SharedWizard;
use crate::{error::ApiError, AppState};

fn parse_session_id(raw: &str) -> Result<QuoteSessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid session id: {}", raw)))
}

async fn session(state: &AppState, raw_id: &str) -> Result<(QuoteSessionId, SharedWizard), ApiError> {
    let session_id = parse_session_id(raw_id)?;
    let wizard = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Quote session {}", session_id)))?;
    Ok((session_id, wizard))
}

/// Opens a new wizard session
pub async fn open_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<StepView>) {
    let (_, wizard) = state.sessions.open().await;
    let view = wizard.lock().await.view();
    (StatusCode::CREATED, Json(view))
}

/// Current step view
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StepView>, ApiError> {
    let (_, wizard) = session(&state, &id).await?;
    let view = wizard.lock().await.view();
    Ok(Json(view))
}

/// Applies a batch of edited inputs in order; an unknown path rejects the whole batch
pub async fn set_fields(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetFieldsRequest>,
) -> Result<Json<StepView>, ApiError> {
    let (_, wizard) = session(&state, &id).await?;

    // Reject the whole batch before touching the draft
    let updates = request
        .fields
        .iter()
        .map(|update| Ok((update.path.parse::<FieldPath>()?, update.raw_value())))
        .collect::<Result<Vec<_>, QuoteError>>()?;

    let mut wizard = wizard.lock().await;
    for (field, raw) in &updates {
        wizard.set_field(*field, raw)?;
    }
    Ok(Json(wizard.view()))
}

/// Validates the current step and moves forward, submitting from the contact step
///
/// The session lock is released while the quote backend is called, so the
/// session stays readable; edits are refused until the outcome is applied.
/// The call and its completion run in their own task, so a client that
/// disconnects mid-submission leaves the session retryable.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let (session_id, shared) = session(&state, &id).await?;

    let (pending, submitter) = {
        let mut wizard = shared.lock().await;
        match wizard.try_advance()? {
            Advance::Moved(_) => {
                return Ok(Json(AdvanceResponse {
                    view: wizard.view(),
                    receipt: None,
                }))
            }
            Advance::Submit(pending) => (pending, wizard.submitter()),
        }
    };

    info!(session_id = %session_id, attempt = pending.attempt, "Submitting quote");
    let sessions = Arc::clone(&state.sessions);
    let task_wizard = Arc::clone(&shared);
    let attempt = pending.attempt;
    let submission = tokio::spawn(async move {
        let outcome = submitter
            .submit_quote(&pending.payload, Some(pending.metadata()))
            .await;

        if !sessions.contains(session_id).await {
            debug!(session_id = %session_id, "Session closed during submission; outcome ignored");
            return None;
        }

        let mut wizard = task_wizard.lock().await;
        let result = wizard.complete_submission(pending.attempt, outcome);
        Some(result.map(|receipt| (receipt, wizard.view())))
    });

    let completed = match submission.await {
        Ok(completed) => completed,
        Err(join_error) => {
            error!(session_id = %session_id, error = %join_error, "Submission task failed");
            shared.lock().await.abandon_submission(attempt);
            return Err(ApiError::Internal("Quote submission did not complete".to_string()));
        }
    };

    match completed {
        Some(result) => {
            let (receipt, view) = result?;
            Ok(Json(AdvanceResponse {
                view,
                receipt: Some(receipt),
            }))
        }
        None => Err(ApiError::NotFound(format!("Quote session {}", session_id))),
    }
}

/// Moves back one step
pub async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StepView>, ApiError> {
    let (_, wizard) = session(&state, &id).await?;
    let mut wizard = wizard.lock().await;
    wizard.retreat()?;
    Ok(Json(wizard.view()))
}

/// Restores the default draft and step 1
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StepView>, ApiError> {
    let (_, wizard) = session(&state, &id).await?;
    let mut wizard = wizard.lock().await;
    wizard.reset();
    Ok(Json(wizard.view()))
}

/// Closes a session
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session_id(&id)?;
    if state.sessions.close(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Quote session {}", session_id)))
    }
}
