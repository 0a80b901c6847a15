/// Focus statistics endpoint
///
/// # Endpoint
///
/// `GET /v1/focus/stats?days=30`
///
/// # Example Response
///
/// ```json
/// {
///   "period_days": 30,
///   "total_focus_minutes": 420,
///   "total_sessions": 12,
///   "avg_session_duration": 35,
///   "total_objectives": 8,
///   "completed_objectives": 6,
///   "objective_completion_rate": 75,
///   "top_focused_tasks": [],
///   "daily_distribution": []
/// }
/// ```

use axum::{extract::Query, extract::State, Extension, Json};
use focushub_core::identity::Identity;
use focushub_core::stats::FocusStats;
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Stats query parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatsQuery {
    /// Trailing window in days (default 30)
    #[validate(range(min = 1, max = 365))]
    pub days: Option<i64>,
}

/// Computes per-user focus statistics over a trailing window
pub async fn focus_stats(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<FocusStats>, ApiError> {
    query.validate()?;

    let stats = state.stats.report(identity.user_id, query.days).await?;

    Ok(Json(stats))
}
