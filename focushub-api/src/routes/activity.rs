/// Recent activity feed endpoint
///
/// # Endpoint
///
/// `GET /v1/activity/recent`
///
/// Returns at most 15 events from the last day, newest first, merged from
/// project creations, task completions, and task creations.
///
/// # Example Response
///
/// ```json
/// [
///   {
///     "activity_type": "task_completed",
///     "primary_subject": "Write report",
///     "secondary_subject": "Q3 planning",
///     "actor": "ada",
///     "timestamp": "2025-01-04T12:00:00Z"
///   }
/// ]
/// ```

use axum::{extract::State, Json};
use focushub_core::activity::ActivityEvent;

use crate::app::AppState;
use crate::error::ApiError;

/// Returns the merged recent-activity feed
///
/// The feed is global: it shows what happened across the workspace, so it
/// carries no per-user filter.
pub async fn recent(State(state): State<AppState>) -> Result<Json<Vec<ActivityEvent>>, ApiError> {
    let feed = state.activity.recent().await?;

    Ok(Json(feed))
}
