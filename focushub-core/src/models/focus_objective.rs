/// Focus objective model and database operations
///
/// An objective is a small checklist item attached to a task. Its lifecycle
/// is independent of focus sessions: objectives are created and completed
/// whether or not a session is running.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE focus_objectives (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     objective_text TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::window::DateWindow;

/// Focus objective record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FocusObjective {
    /// Unique objective ID
    pub id: Uuid,

    /// Task the objective belongs to
    pub task_id: Uuid,

    /// Objective text
    pub objective_text: String,

    /// Whether the objective has been completed
    pub completed: bool,

    /// When the objective was created
    pub created_at: DateTime<Utc>,
}

/// Objective totals for a user over a window
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct ObjectiveTotals {
    /// Objectives created in the window for the user's tasks
    pub total: i64,

    /// Of those, how many are completed
    pub completed: i64,
}

impl FocusObjective {
    /// Creates a new objective on a task
    pub async fn create(
        pool: &PgPool,
        task_id: Uuid,
        objective_text: &str,
        completed: bool,
    ) -> Result<Self, sqlx::Error> {
        let objective = sqlx::query_as::<_, FocusObjective>(
            r#"
            INSERT INTO focus_objectives (task_id, objective_text, completed)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, objective_text, completed, created_at
            "#,
        )
        .bind(task_id)
        .bind(objective_text)
        .bind(completed)
        .fetch_one(pool)
        .await?;

        Ok(objective)
    }

    /// Lists a task's objectives, oldest first
    pub async fn list_for_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let objectives = sqlx::query_as::<_, FocusObjective>(
            r#"
            SELECT id, task_id, objective_text, completed, created_at
            FROM focus_objectives
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(objectives)
    }

    /// Updates an objective's text and/or completed flag
    ///
    /// Omitted fields keep their current value. Returns the updated row, or
    /// `None` if the objective does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        objective_text: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let objective = sqlx::query_as::<_, FocusObjective>(
            r#"
            UPDATE focus_objectives
            SET objective_text = COALESCE($2, objective_text),
                completed = COALESCE($3, completed)
            WHERE id = $1
            RETURNING id, task_id, objective_text, completed, created_at
            "#,
        )
        .bind(id)
        .bind(objective_text)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(objective)
    }

    /// Deletes an objective
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM focus_objectives WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts completed objectives on a user's tasks within a window
    ///
    /// The window applies to `created_at`, matching the dashboard's
    /// "objectives completed this week" semantics.
    pub async fn count_completed_in_window(
        pool: &PgPool,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM focus_objectives fo
            JOIN tasks t ON fo.task_id = t.id
            WHERE t.assigned_to = $1
              AND fo.completed = TRUE
              AND fo.created_at >= $2
              AND fo.created_at < $3
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Totals and completed counts for a user's objectives within a window
    pub async fn totals_in_window(
        pool: &PgPool,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<ObjectiveTotals, sqlx::Error> {
        let totals = sqlx::query_as::<_, ObjectiveTotals>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE fo.completed) AS completed
            FROM focus_objectives fo
            JOIN tasks t ON fo.task_id = t.id
            WHERE t.assigned_to = $1
              AND fo.created_at >= $2
              AND fo.created_at < $3
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(pool)
        .await?;

        Ok(totals)
    }
}
