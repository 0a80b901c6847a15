/// Dashboard analytics endpoint
///
/// # Endpoint
///
/// `GET /v1/analytics/summary?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
///
/// Without dates the summary covers the trailing seven days. With explicit
/// dates the end day is included in full.
///
/// # Example Response
///
/// ```json
/// {
///   "completedThisWeek": 4,
///   "productivityChange": 0,
///   "focusMinutesThisWeek": 125,
///   "objectivesCompletedThisWeek": 3,
///   "collaborativeProjectsCount": 2
/// }
/// ```

use axum::{extract::Query, extract::State, Extension, Json};
use focushub_core::analytics::AnalyticsSummary;
use focushub_core::identity::Identity;
use focushub_core::window::DateWindow;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;

/// Summary query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryQuery {
    /// Optional window start (YYYY-MM-DD)
    pub start_date: Option<String>,

    /// Optional window end (YYYY-MM-DD), included in full
    pub end_date: Option<String>,
}

/// Computes the dashboard summary for the caller
///
/// # Errors
///
/// - 400 on malformed or half-specified dates
/// - 500 on store failure (never a partial summary)
pub async fn summary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let window = DateWindow::resolve(query.start_date.as_deref(), query.end_date.as_deref())?;

    let summary = state.analytics.summary(identity.user_id, window).await?;

    Ok(Json(summary))
}
