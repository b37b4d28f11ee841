//! HTTP handlers for analysis sessions and treatment confirmation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::session::{ConfirmTreatmentOutcome, Session};
use crate::AppState;

/// Start a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Session>) {
    let session = state.sessions.create_session().await;
    (StatusCode::CREATED, Json(session))
}

/// Get a session and its confirmed treatments
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<Session>> {
    let session = state.sessions.get_session(session_id).await?;
    Ok(Json(session))
}

/// End a session
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.end_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Input for confirming a treatment
#[derive(Debug, Deserialize)]
pub struct ConfirmTreatmentInput {
    pub date: NaiveDate,
}

/// Confirm that a suggested date was treated
pub async fn confirm_treatment(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<ConfirmTreatmentInput>,
) -> AppResult<Json<ConfirmTreatmentOutcome>> {
    let outcome = state
        .sessions
        .confirm_treatment(session_id, input.date)
        .await?;
    Ok(Json(outcome))
}
