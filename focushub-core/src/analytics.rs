/// Dashboard analytics aggregation
///
/// Computes the fixed set of dashboard summary metrics for a user over a
/// [`DateWindow`]. Each metric is one read-only query against the store;
/// any individual query failure fails the whole call, so the summary is
/// never partially populated.
///
/// # Metrics
///
/// 1. `completedThisWeek`: tasks assigned to the user with completed
///    status and `COALESCE(completed_at, due_date)` inside the window
/// 2. `productivityChange`: reserved, always `0` (stable placeholder for
///    the dashboard contract, not a bug)
/// 3. `focusMinutesThisWeek`: closed-session seconds with `start_time`
///    inside the window, as minutes rounded to nearest integer
/// 4. `objectivesCompletedThisWeek`: completed objectives on the user's
///    tasks created inside the window
/// 5. `collaborativeProjectsCount`: system-wide count of projects with
///    tasks assigned to more than one distinct user (not window-filtered)

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::focus_objective::FocusObjective;
use crate::models::focus_session::FocusSession;
use crate::models::project::Project;
use crate::models::task::Task;
use crate::window::DateWindow;

/// Flat dashboard summary record, serialized camelCase for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Tasks completed in the window
    pub completed_this_week: i64,

    /// Reserved metric, always 0
    pub productivity_change: i64,

    /// Closed focus time in the window, whole minutes
    pub focus_minutes_this_week: i64,

    /// Completed objectives created in the window
    pub objectives_completed_this_week: i64,

    /// System-wide collaborative project count
    pub collaborative_projects_count: i64,
}

/// Computes dashboard summary metrics over a date window
#[derive(Clone)]
pub struct AnalyticsAggregator {
    db: PgPool,
}

impl AnalyticsAggregator {
    /// Creates an aggregator over a connection pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Computes the five-metric summary for a user
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx::Error` if any query fails; no partial
    /// summary is ever returned.
    pub async fn summary(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<AnalyticsSummary, sqlx::Error> {
        let completed_this_week =
            Task::count_completed_in_window(&self.db, user_id, window).await?;

        let focus_seconds = FocusSession::sum_closed_seconds(&self.db, user_id, window).await?;

        let objectives_completed_this_week =
            FocusObjective::count_completed_in_window(&self.db, user_id, window).await?;

        let collaborative_projects_count = Project::collaborative_count(&self.db).await?;

        Ok(AnalyticsSummary {
            completed_this_week,
            // Not yet computable; kept at 0 so the record shape stays stable.
            productivity_change: 0,
            focus_minutes_this_week: focus_minutes(focus_seconds),
            objectives_completed_this_week,
            collaborative_projects_count,
        })
    }
}

/// Converts total seconds to whole minutes, rounded to nearest
pub fn focus_minutes(total_seconds: i64) -> i64 {
    (total_seconds as f64 / 60.0).round() as i64
}
