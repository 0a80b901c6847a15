/// Focus-session endpoints
///
/// These endpoints drive the per-user focus-session state machine and list
/// session history.
///
/// # Endpoints
///
/// - `POST /v1/focus/start`: start a session on a task
/// - `POST /v1/focus/end`: end the active session
/// - `POST /v1/focus/pause`: pause (currently closes the session)
/// - `POST /v1/focus/discard`: close the active session, keeping its time
/// - `GET  /v1/focus/active`: the active session, or null
/// - `GET  /v1/focus/sessions`: closed sessions over a trailing window
///
/// # Example Request
///
/// ```json
/// { "task_id": "550e8400-e29b-41d4-a716-446655440000" }
/// ```
///
/// # Example Response (start)
///
/// ```json
/// {
///   "session_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
///   "task_id": "550e8400-e29b-41d4-a716-446655440000",
///   "start_time": "2025-01-04T12:00:00Z"
/// }
/// ```

use axum::{extract::Query, extract::State, http::StatusCode, Extension, Json};
use focushub_core::identity::Identity;
use focushub_core::models::focus_session::SessionWithTask;
use focushub_core::tracker::{ActiveSession, ClosedSessionSummary, StartedSession};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Start session request
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    /// Task to focus on
    pub task_id: Uuid,
}

/// Discard session response
///
/// Discarding is always a success; `closed` reports whether a session was
/// actually open and recorded.
#[derive(Debug, Clone, Serialize)]
pub struct DiscardSessionResponse {
    /// The closed session, if one was open
    pub closed: Option<ClosedSessionSummary>,

    /// Human-readable outcome
    pub message: String,
}

/// Session history query parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionHistoryQuery {
    /// Trailing window in days (default 7)
    #[validate(range(min = 1, max = 365))]
    pub days: Option<i64>,
}

/// Starts a focus session on a task
///
/// # Errors
///
/// - 403 if the caller's role is read-only
/// - 409 if a session is already active
pub async fn start_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartedSession>), ApiError> {
    let started = state.tracker.start(&identity, request.task_id).await?;

    Ok((StatusCode::CREATED, Json(started)))
}

/// Ends the active focus session
///
/// # Errors
///
/// - 403 if the caller's role is read-only
/// - 404 if no session is active
pub async fn end_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ClosedSessionSummary>, ApiError> {
    let closed = state.tracker.end(&identity).await?;

    Ok(Json(closed))
}

/// Pauses the active focus session
///
/// Pause currently closes the session outright; there is no resume.
pub async fn pause_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ClosedSessionSummary>, ApiError> {
    let closed = state.tracker.pause(&identity).await?;

    Ok(Json(closed))
}

/// Discards the active focus session
///
/// The session is closed and recorded, never deleted, so its focus time
/// keeps counting toward analytics. Succeeds as a no-op when idle.
pub async fn discard_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<DiscardSessionResponse>, ApiError> {
    let closed = state.tracker.discard(&identity).await?;

    let message = if closed.is_some() {
        "The active session has been closed and recorded".to_string()
    } else {
        "No active session to discard".to_string()
    };

    Ok(Json(DiscardSessionResponse { closed, message }))
}

/// Returns the caller's active session, or JSON null when idle
pub async fn active_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Option<ActiveSession>>, ApiError> {
    let active = state.tracker.active(identity.user_id).await?;

    Ok(Json(active))
}

/// Lists the caller's closed sessions over a trailing window
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<SessionHistoryQuery>,
) -> Result<Json<Vec<SessionWithTask>>, ApiError> {
    query.validate()?;

    let sessions = state.tracker.sessions(identity.user_id, query.days).await?;

    Ok(Json(sessions))
}
