/// Project model and database operations
///
/// Projects own zero or more tasks. Deleting a project cascades to its
/// tasks and, through them, to dependent focus sessions and objectives in
/// one transaction, so no focus record can outlive its task.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     status VARCHAR(50) NOT NULL DEFAULT 'active',
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project title
    pub title: String,

    /// Project status (e.g., "active", "archived")
    pub status: String,

    /// User who created the project (nullable if user deleted)
    pub created_by: Option<Uuid>,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project title
    pub title: String,

    /// Creating user
    pub created_by: Option<Uuid>,
}

impl Project {
    /// Creates a new project
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, created_by)
            VALUES ($1, $2)
            RETURNING id, title, status, created_by, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, title, status, created_by, created_at FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Counts projects with tasks assigned to more than one distinct user
    ///
    /// This is a system-wide signal shown on every user's dashboard: it is
    /// intentionally neither window-filtered nor user-filtered.
    pub async fn collaborative_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT p.id)
            FROM projects p
            WHERE p.id IN (
                SELECT t.project_id
                FROM tasks t
                WHERE t.project_id IS NOT NULL
                GROUP BY t.project_id
                HAVING COUNT(DISTINCT t.assigned_to) > 1
            )
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Deletes a project and, via cascade, its tasks and their focus data
    ///
    /// The foreign-key cascades run inside the statement's implicit
    /// transaction: either everything is removed or nothing is.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
