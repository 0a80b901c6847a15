/// Per-user focus statistics
///
/// Deeper statistics than the dashboard summary: totals, averages, top
/// tasks, and weekday distribution over a trailing window. Built on the
/// same closed-session and objective data as the analytics summary, with
/// different groupings.
///
/// The closed sessions for the window are fetched once and folded in
/// memory; the folds are pure functions so the groupings are testable
/// without a store.

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::analytics::focus_minutes;
use crate::models::focus_objective::FocusObjective;
use crate::models::focus_session::{ClosedSession, FocusSession};
use crate::tracker::minutes_one_decimal;
use crate::window::DateWindow;

/// Default stats window, in days
pub const DEFAULT_STATS_DAYS: i64 = 30;

/// How many top-focused tasks to report
const TOP_TASKS_LIMIT: usize = 5;

/// Per-task focus totals within the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFocus {
    /// Task ID
    pub task_id: Uuid,

    /// Task title (null if the task was deleted)
    pub task_title: Option<String>,

    /// Closed sessions on this task
    pub session_count: i64,

    /// Total focused seconds
    pub total_seconds: i64,

    /// Total focused minutes, one decimal
    pub total_minutes: f64,
}

/// Focus totals for one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayFocus {
    /// English day name derived from session start times
    pub day_name: String,

    /// Total focused seconds on that day of the week
    pub total_seconds: i64,

    /// Total focused minutes, one decimal
    pub total_minutes: f64,
}

/// Full per-user statistics record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusStats {
    /// Window length the stats cover, in days
    pub period_days: i64,

    /// Total closed focus time, whole minutes
    pub total_focus_minutes: i64,

    /// Closed sessions in the window
    pub total_sessions: i64,

    /// Average session length in whole minutes (0 when no sessions)
    pub avg_session_duration: i64,

    /// Objectives created in the window for the user's tasks
    pub total_objectives: i64,

    /// Of those, how many are completed
    pub completed_objectives: i64,

    /// Completion percentage, rounded (0 when no objectives)
    pub objective_completion_rate: i64,

    /// Top tasks by summed focus time, descending
    pub top_focused_tasks: Vec<TaskFocus>,

    /// Weekday distribution, Sunday-first; days without sessions omitted
    pub daily_distribution: Vec<DayFocus>,
}

/// Computes per-user focus statistics over a trailing window
#[derive(Clone)]
pub struct StatsReporter {
    db: PgPool,
}

impl StatsReporter {
    /// Creates a reporter over a connection pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Computes the statistics record for a user
    ///
    /// `days` defaults to [`DEFAULT_STATS_DAYS`].
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx::Error` if any query fails.
    pub async fn report(&self, user_id: Uuid, days: Option<i64>) -> Result<FocusStats, sqlx::Error> {
        let period_days = days.unwrap_or(DEFAULT_STATS_DAYS);
        let window = DateWindow::last_days(period_days);

        let sessions = FocusSession::closed_in_window(&self.db, user_id, window).await?;
        let objectives = FocusObjective::totals_in_window(&self.db, user_id, window).await?;

        let total_seconds: i64 = sessions.iter().map(|s| s.duration_seconds).sum();
        let total_focus_minutes = focus_minutes(total_seconds);
        let total_sessions = sessions.len() as i64;

        Ok(FocusStats {
            period_days,
            total_focus_minutes,
            total_sessions,
            avg_session_duration: average_minutes(total_focus_minutes, total_sessions),
            total_objectives: objectives.total,
            completed_objectives: objectives.completed,
            objective_completion_rate: completion_rate(objectives.completed, objectives.total),
            top_focused_tasks: top_focused_tasks(&sessions, TOP_TASKS_LIMIT),
            daily_distribution: weekday_distribution(&sessions),
        })
    }
}

/// Average session length in whole minutes; 0 when there are no sessions
pub fn average_minutes(total_minutes: i64, session_count: i64) -> i64 {
    if session_count > 0 {
        (total_minutes as f64 / session_count as f64).round() as i64
    } else {
        0
    }
}

/// Rounded completion percentage; 0 when there are no objectives
pub fn completion_rate(completed: i64, total: i64) -> i64 {
    if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as i64
    } else {
        0
    }
}

/// Groups closed sessions per task and returns the `limit` most focused
///
/// Ordered by total seconds descending; ties broken by task id ascending
/// so the ranking is stable across runs.
pub fn top_focused_tasks(sessions: &[ClosedSession], limit: usize) -> Vec<TaskFocus> {
    let mut per_task: Vec<TaskFocus> = Vec::new();

    for session in sessions {
        match per_task.iter_mut().find(|t| t.task_id == session.task_id) {
            Some(entry) => {
                entry.session_count += 1;
                entry.total_seconds += session.duration_seconds;
            }
            None => per_task.push(TaskFocus {
                task_id: session.task_id,
                task_title: session.task_title.clone(),
                session_count: 1,
                total_seconds: session.duration_seconds,
                total_minutes: 0.0,
            }),
        }
    }

    per_task.sort_by(|a, b| {
        b.total_seconds
            .cmp(&a.total_seconds)
            .then(a.task_id.cmp(&b.task_id))
    });
    per_task.truncate(limit);

    for entry in &mut per_task {
        entry.total_minutes = minutes_one_decimal(entry.total_seconds);
    }

    per_task
}

/// Groups closed sessions by the weekday of their start time
///
/// Ordered Sunday-first by weekday index. Days without sessions are
/// omitted entirely rather than reported as zero.
pub fn weekday_distribution(sessions: &[ClosedSession]) -> Vec<DayFocus> {
    let mut per_day: [i64; 7] = [0; 7];

    for session in sessions {
        per_day[weekday_index(session.start_time)] += session.duration_seconds;
    }

    per_day
        .iter()
        .enumerate()
        .filter(|(_, &seconds)| seconds > 0)
        .map(|(index, &seconds)| DayFocus {
            day_name: DAY_NAMES[index].to_string(),
            total_seconds: seconds,
            total_minutes: minutes_one_decimal(seconds),
        })
        .collect()
}

/// English day names, Sunday-first
const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn weekday_index(at: DateTime<Utc>) -> usize {
    match at.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(task: Uuid, title: &str, start: DateTime<Utc>, seconds: i64) -> ClosedSession {
        ClosedSession {
            task_id: task,
            task_title: Some(title.to_string()),
            start_time: start,
            duration_seconds: seconds,
        }
    }

    // 2024-06-03 was a Monday
    fn monday(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, 0, 0).unwrap()
    }

    fn sunday(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_average_minutes_guards_division_by_zero() {
        assert_eq!(average_minutes(0, 0), 0);
        assert_eq!(average_minutes(30, 2), 15);
        assert_eq!(average_minutes(25, 2), 13);
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
    }

    #[test]
    fn test_top_tasks_ranked_by_total_seconds() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let sessions = vec![
            session(a, "small", monday(9), 300),
            session(b, "big", monday(10), 900),
            session(a, "small", monday(11), 300),
        ];

        let top = top_focused_tasks(&sessions, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].task_id, b);
        assert_eq!(top[0].total_seconds, 900);
        assert_eq!(top[0].session_count, 1);
        assert_eq!(top[1].task_id, a);
        assert_eq!(top[1].total_seconds, 600);
        assert_eq!(top[1].session_count, 2);
        assert_eq!(top[1].total_minutes, 10.0);
    }

    #[test]
    fn test_top_tasks_tie_breaks_by_task_id() {
        let mut ids = [Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();

        let sessions = vec![
            session(ids[1], "later id", monday(9), 600),
            session(ids[0], "earlier id", monday(10), 600),
        ];

        let top = top_focused_tasks(&sessions, 5);
        assert_eq!(top[0].task_id, ids[0]);
        assert_eq!(top[1].task_id, ids[1]);
    }

    #[test]
    fn test_top_tasks_truncates() {
        let sessions: Vec<ClosedSession> = (0..8)
            .map(|i| session(Uuid::new_v4(), "t", monday(9), 100 * (i + 1)))
            .collect();

        let top = top_focused_tasks(&sessions, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].total_seconds, 800);
    }

    #[test]
    fn test_weekday_distribution_sunday_first_and_omits_empty_days() {
        let t = Uuid::new_v4();
        let sessions = vec![
            session(t, "t", monday(9), 600),
            session(t, "t", sunday(9), 300),
            session(t, "t", monday(14), 600),
        ];

        let days = weekday_distribution(&sessions);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_name, "Sunday");
        assert_eq!(days[0].total_seconds, 300);
        assert_eq!(days[1].day_name, "Monday");
        assert_eq!(days[1].total_seconds, 1200);
        assert_eq!(days[1].total_minutes, 20.0);
    }

    #[test]
    fn test_weekday_distribution_empty() {
        assert!(weekday_distribution(&[]).is_empty());
    }
}
