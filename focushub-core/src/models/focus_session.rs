/// Focus session model and database operations
///
/// A focus session is a timed interval a user dedicates to one task. It is
/// open while `end_time IS NULL` and closed once end time and duration are
/// recorded. Sessions are never deleted by lifecycle operations; deleting
/// them would destroy the focus-time history the analytics are built on.
///
/// # Invariant
///
/// At most one open session per user, enforced by a partial unique index:
///
/// ```sql
/// CREATE TABLE focus_sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     start_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     end_time TIMESTAMPTZ,
///     duration_seconds BIGINT
/// );
///
/// CREATE UNIQUE INDEX focus_sessions_one_active
///     ON focus_sessions (user_id)
///     WHERE end_time IS NULL;
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::window::DateWindow;

/// Focus session record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FocusSession {
    /// Unique session ID
    pub id: Uuid,

    /// User the session belongs to
    pub user_id: Uuid,

    /// Task being focused on
    pub task_id: Uuid,

    /// When the session started
    pub start_time: DateTime<Utc>,

    /// When the session ended (null while open)
    pub end_time: Option<DateTime<Utc>>,

    /// Recorded duration in whole seconds (null until closed)
    pub duration_seconds: Option<i64>,
}

/// Closed session joined with its task title, for session history listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionWithTask {
    /// Session ID
    pub id: Uuid,

    /// Task being focused on
    pub task_id: Uuid,

    /// Task title (null if the task was deleted)
    pub task_title: Option<String>,

    /// When the session started
    pub start_time: DateTime<Utc>,

    /// When the session ended
    pub end_time: Option<DateTime<Utc>>,

    /// Recorded duration in whole seconds
    pub duration_seconds: Option<i64>,

    /// Recorded duration in minutes, rounded to one decimal
    pub duration_minutes: Option<f64>,
}

/// Minimal closed-session row consumed by the stats folds
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClosedSession {
    /// Task being focused on
    pub task_id: Uuid,

    /// Task title (null if the task was deleted)
    pub task_title: Option<String>,

    /// When the session started
    pub start_time: DateTime<Utc>,

    /// Recorded duration in whole seconds
    pub duration_seconds: i64,
}

impl FocusSession {
    /// Opens a new session for a user on a task
    ///
    /// Races between concurrent opens are settled by the partial unique
    /// index: the losing insert fails with a unique violation.
    pub async fn open(pool: &PgPool, user_id: Uuid, task_id: Uuid) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, FocusSession>(
            r#"
            INSERT INTO focus_sessions (user_id, task_id)
            VALUES ($1, $2)
            RETURNING id, user_id, task_id, start_time, end_time, duration_seconds
            "#,
        )
        .bind(user_id)
        .bind(task_id)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds the user's open session, if any
    ///
    /// Ordered by start time descending so that the most recently started
    /// row wins should more than one open row ever exist (pre-index data).
    pub async fn find_active(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, FocusSession>(
            r#"
            SELECT id, user_id, task_id, start_time, end_time, duration_seconds
            FROM focus_sessions
            WHERE user_id = $1 AND end_time IS NULL
            ORDER BY start_time DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Closes the user's most recently started open session
    ///
    /// End time and duration are computed and written in a single UPDATE,
    /// so both fields land atomically. Duration is truncated to whole
    /// seconds. Returns the closed row, or `None` when the user is idle.
    pub async fn close_active(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, FocusSession>(
            r#"
            UPDATE focus_sessions
            SET end_time = NOW(),
                duration_seconds = FLOOR(EXTRACT(EPOCH FROM (NOW() - start_time)))::BIGINT
            WHERE id = (
                SELECT id FROM focus_sessions
                WHERE user_id = $1 AND end_time IS NULL
                ORDER BY start_time DESC
                LIMIT 1
            )
            RETURNING id, user_id, task_id, start_time, end_time, duration_seconds
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Sums closed-session seconds for a user over a window
    ///
    /// Only closed sessions count; an in-flight session contributes nothing
    /// until it is closed.
    pub async fn sum_closed_seconds(
        pool: &PgPool,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(duration_seconds), 0)::BIGINT
            FROM focus_sessions
            WHERE user_id = $1
              AND start_time >= $2
              AND start_time < $3
              AND end_time IS NOT NULL
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    /// Lists a user's closed sessions within a window, newest first
    pub async fn list_closed(
        pool: &PgPool,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<Vec<SessionWithTask>, sqlx::Error> {
        let sessions = sqlx::query_as::<_, SessionWithTask>(
            r#"
            SELECT fs.id, fs.task_id, t.title AS task_title,
                   fs.start_time, fs.end_time, fs.duration_seconds,
                   ROUND(fs.duration_seconds::NUMERIC / 60, 1)::FLOAT8 AS duration_minutes
            FROM focus_sessions fs
            LEFT JOIN tasks t ON fs.task_id = t.id
            WHERE fs.user_id = $1
              AND fs.start_time >= $2
              AND fs.start_time < $3
              AND fs.end_time IS NOT NULL
            ORDER BY fs.start_time DESC
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;

        Ok(sessions)
    }

    /// Fetches the closed-session rows the stats folds aggregate over
    pub async fn closed_in_window(
        pool: &PgPool,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<Vec<ClosedSession>, sqlx::Error> {
        let sessions = sqlx::query_as::<_, ClosedSession>(
            r#"
            SELECT fs.task_id, t.title AS task_title, fs.start_time,
                   fs.duration_seconds
            FROM focus_sessions fs
            LEFT JOIN tasks t ON fs.task_id = t.id
            WHERE fs.user_id = $1
              AND fs.start_time >= $2
              AND fs.start_time < $3
              AND fs.end_time IS NOT NULL
            ORDER BY fs.start_time ASC
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;

        Ok(sessions)
    }
}
