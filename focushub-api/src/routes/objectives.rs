/// Focus-objective endpoints
///
/// Objectives are small checklist items attached to a task. Their lifecycle
/// is independent of focus sessions, but completed objectives feed the
/// dashboard metrics and the focus statistics.
///
/// # Endpoints
///
/// - `GET    /v1/tasks/:task_id/objectives`: list a task's objectives
/// - `POST   /v1/tasks/:task_id/objectives`: add an objective
/// - `PUT    /v1/objectives/:id`: update text and/or completed flag
/// - `DELETE /v1/objectives/:id`: remove an objective
///
/// # Example Request (create)
///
/// ```json
/// { "objective_text": "Outline the report", "completed": false }
/// ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use focushub_core::identity::Identity;
use focushub_core::models::focus_objective::FocusObjective;
use focushub_core::models::task::Task;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Create objective request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateObjectiveRequest {
    /// Objective text
    #[validate(length(min = 1, max = 500))]
    pub objective_text: String,

    /// Initial completed flag (defaults to false)
    pub completed: Option<bool>,
}

/// Update objective request
///
/// Omitted fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateObjectiveRequest {
    /// New objective text
    #[validate(length(min = 1, max = 500))]
    pub objective_text: Option<String>,

    /// New completed flag
    pub completed: Option<bool>,
}

/// Delete objective response
#[derive(Debug, Clone, Serialize)]
pub struct DeleteObjectiveResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Lists a task's objectives
///
/// # Errors
///
/// - 404 if the task does not exist
pub async fn list_objectives(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Vec<FocusObjective>>, ApiError> {
    require_task(&state, task_id).await?;

    let objectives = FocusObjective::list_for_task(&state.db, task_id).await?;

    Ok(Json(objectives))
}

/// Adds an objective to a task
///
/// # Errors
///
/// - 403 if the caller's role is read-only
/// - 404 if the task does not exist
/// - 422 on empty or overlong text
pub async fn create_objective(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<CreateObjectiveRequest>,
) -> Result<(StatusCode, Json<FocusObjective>), ApiError> {
    identity.require_mutate()?;
    request.validate()?;
    require_task(&state, task_id).await?;

    let objective = FocusObjective::create(
        &state.db,
        task_id,
        &request.objective_text,
        request.completed.unwrap_or(false),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(objective)))
}

/// Updates an objective's text and/or completed flag
///
/// # Errors
///
/// - 403 if the caller's role is read-only
/// - 404 if the objective does not exist
pub async fn update_objective(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateObjectiveRequest>,
) -> Result<Json<FocusObjective>, ApiError> {
    identity.require_mutate()?;
    request.validate()?;

    let objective = FocusObjective::update(
        &state.db,
        id,
        request.objective_text.as_deref(),
        request.completed,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Objective not found".to_string()))?;

    Ok(Json(objective))
}

/// Deletes an objective
///
/// # Errors
///
/// - 403 if the caller's role is read-only
/// - 404 if the objective does not exist
pub async fn delete_objective(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteObjectiveResponse>, ApiError> {
    identity.require_mutate()?;

    if !FocusObjective::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Objective not found".to_string()));
    }

    Ok(Json(DeleteObjectiveResponse {
        message: "Objective deleted".to_string(),
    }))
}

async fn require_task(state: &AppState, task_id: Uuid) -> Result<(), ApiError> {
    Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    Ok(())
}
