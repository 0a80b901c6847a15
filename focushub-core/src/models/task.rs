/// Task model and database operations
///
/// Tasks belong to at most one project and may be assigned to a user.
/// `completed_at` is set exactly when status becomes `completed`, never
/// independently.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     priority VARCHAR(50) NOT NULL DEFAULT 'medium',
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     due_date TIMESTAMPTZ,
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use focushub_core::models::task::{CreateTask, Task};
/// use focushub_core::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     project_id: None,
///     title: "Write report".to_string(),
///     assigned_to: Some(Uuid::new_v4()),
///     created_by: None,
///     due_date: None,
/// }).await?;
///
/// // Mark it completed; completed_at is stamped in the same statement.
/// Task::complete(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::window::DateWindow;

/// Status value marking a task as completed
pub const STATUS_COMPLETED: &str = "completed";

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning project, if any
    pub project_id: Option<Uuid>,

    /// Task title
    pub title: String,

    /// Task status (e.g., "pending", "completed")
    pub status: String,

    /// Task priority
    pub priority: String,

    /// Assigned user (nullable if user deleted or unassigned)
    pub assigned_to: Option<Uuid>,

    /// User who created the task
    pub created_by: Option<Uuid>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was completed (set exactly when status becomes completed)
    pub completed_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning project, if any
    pub project_id: Option<Uuid>,

    /// Task title
    pub title: String,

    /// Assigned user
    pub assigned_to: Option<Uuid>,

    /// Creating user
    pub created_by: Option<Uuid>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task in pending state
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, assigned_to, created_by, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, status, priority, assigned_to,
                      created_by, due_date, completed_at, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.assigned_to)
        .bind(data.created_by)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, status, priority, assigned_to,
                   created_by, due_date, completed_at, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Marks a task completed, stamping `completed_at` in the same statement
    pub async fn complete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = 'completed',
                completed_at = NOW()
            WHERE id = $1 AND status <> 'completed'
            RETURNING id, project_id, title, status, priority, assigned_to,
                      created_by, due_date, completed_at, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Counts tasks completed by a user within a window
    ///
    /// A task counts when it is assigned to the user, has completed status,
    /// and `COALESCE(completed_at, due_date)` falls inside the window.
    pub async fn count_completed_in_window(
        pool: &PgPool,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE assigned_to = $1
              AND status = 'completed'
              AND COALESCE(completed_at, due_date) >= $2
              AND COALESCE(completed_at, due_date) < $3
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
