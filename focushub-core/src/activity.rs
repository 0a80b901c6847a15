/// Recent activity feed
///
/// Fan-in merges three independently time-stamped entity-change streams
/// into one ranked feed for the dashboard:
///
/// - `project_created`: projects created since the cutoff
/// - `task_completed`: tasks completed since the cutoff
/// - `task_created`: tasks created since the cutoff
///
/// Events are synthesized on demand from task/project records; nothing is
/// persisted. Each producer filters by its own timestamp against a cutoff
/// of `now - RECENT_ACTIVITY_DAYS_LIMIT`. The merged feed is sorted by
/// timestamp descending and truncated to `RECENT_ACTIVITY_ITEMS_LIMIT`
/// entries. Equal timestamps keep the concatenation order (projects, then
/// completions, then creations).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Cutoff for feed events, in days
pub const RECENT_ACTIVITY_DAYS_LIMIT: i64 = 1;

/// Maximum entries in the merged feed
pub const RECENT_ACTIVITY_ITEMS_LIMIT: usize = 15;

/// Actor shown when the originating user is unknown or deleted
const SYSTEM_ACTOR: &str = "System";

/// Kind of activity event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A project was created
    ProjectCreated,

    /// A task was completed
    TaskCompleted,

    /// A task was created
    TaskCreated,
}

/// Synthesized activity event; produced on demand, never stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// What happened
    #[serde(rename = "activity_type")]
    pub kind: ActivityKind,

    /// Title of the project or task the event is about
    pub primary_subject: String,

    /// Owning project title for task events, if any
    pub secondary_subject: Option<String>,

    /// Username of the actor, or "System" when unknown
    pub actor: String,

    /// When the event happened
    pub timestamp: DateTime<Utc>,
}

/// Row shape shared by all three producer queries
#[derive(Debug, Clone, sqlx::FromRow)]
struct EventRow {
    primary_subject: String,
    secondary_subject: Option<String>,
    actor: String,
    timestamp: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self, kind: ActivityKind) -> ActivityEvent {
        ActivityEvent {
            kind,
            primary_subject: self.primary_subject,
            secondary_subject: self.secondary_subject,
            actor: self.actor,
            timestamp: self.timestamp,
        }
    }
}

/// Merges entity-change streams into one ranked dashboard feed
#[derive(Clone)]
pub struct ActivityFeedMerger {
    db: PgPool,
}

impl ActivityFeedMerger {
    /// Creates a merger over a connection pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Produces the merged feed: at most [`RECENT_ACTIVITY_ITEMS_LIMIT`]
    /// events newer than the cutoff, newest first
    pub async fn recent(&self) -> Result<Vec<ActivityEvent>, sqlx::Error> {
        let cutoff = Utc::now() - Duration::days(RECENT_ACTIVITY_DAYS_LIMIT);

        let projects = self.projects_created(cutoff).await?;
        let completions = self.tasks_completed(cutoff).await?;
        let creations = self.tasks_created(cutoff).await?;

        Ok(merge_feed(
            vec![projects, completions, creations],
            RECENT_ACTIVITY_ITEMS_LIMIT,
        ))
    }

    /// One event per project created since the cutoff
    async fn projects_created(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ActivityEvent>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT p.title AS primary_subject,
                   NULL AS secondary_subject,
                   COALESCE(u.username, $2) AS actor,
                   p.created_at AS timestamp
            FROM projects p
            LEFT JOIN users u ON p.created_by = u.id
            WHERE p.created_at >= $1
            "#,
        )
        .bind(cutoff)
        .bind(SYSTEM_ACTOR)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| r.into_event(ActivityKind::ProjectCreated))
            .collect())
    }

    /// One event per task completed since the cutoff; actor is the assignee
    async fn tasks_completed(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ActivityEvent>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT t.title AS primary_subject,
                   p.title AS secondary_subject,
                   COALESCE(u.username, $2) AS actor,
                   t.completed_at AS timestamp
            FROM tasks t
            LEFT JOIN users u ON t.assigned_to = u.id
            LEFT JOIN projects p ON t.project_id = p.id
            WHERE t.status = 'completed'
              AND t.completed_at IS NOT NULL
              AND t.completed_at >= $1
            "#,
        )
        .bind(cutoff)
        .bind(SYSTEM_ACTOR)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| r.into_event(ActivityKind::TaskCompleted))
            .collect())
    }

    /// One event per task created since the cutoff; actor is the creator
    async fn tasks_created(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ActivityEvent>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT t.title AS primary_subject,
                   p.title AS secondary_subject,
                   COALESCE(u.username, $2) AS actor,
                   t.created_at AS timestamp
            FROM tasks t
            LEFT JOIN users u ON t.created_by = u.id
            LEFT JOIN projects p ON t.project_id = p.id
            WHERE t.created_at >= $1
            "#,
        )
        .bind(cutoff)
        .bind(SYSTEM_ACTOR)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| r.into_event(ActivityKind::TaskCreated))
            .collect())
    }
}

/// Concatenates the streams, stable-sorts by timestamp descending, and
/// truncates to `limit` entries
///
/// The stable sort means events with equal timestamps keep the order of
/// the input streams.
pub fn merge_feed(streams: Vec<Vec<ActivityEvent>>, limit: usize) -> Vec<ActivityEvent> {
    let mut merged: Vec<ActivityEvent> = streams.into_iter().flatten().collect();
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(kind: ActivityKind, subject: &str, timestamp: DateTime<Utc>) -> ActivityEvent {
        ActivityEvent {
            kind,
            primary_subject: subject.to_string(),
            secondary_subject: None,
            actor: "ada".to_string(),
            timestamp,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_merge_sorts_newest_first() {
        let feed = merge_feed(
            vec![
                vec![event(ActivityKind::ProjectCreated, "a", at(9, 0))],
                vec![event(ActivityKind::TaskCompleted, "b", at(11, 0))],
                vec![event(ActivityKind::TaskCreated, "c", at(10, 0))],
            ],
            15,
        );

        let subjects: Vec<&str> = feed.iter().map(|e| e.primary_subject.as_str()).collect();
        assert_eq!(subjects, vec!["b", "c", "a"]);

        // Non-increasing timestamps throughout.
        for pair in feed.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn test_merge_truncates_to_limit() {
        let many: Vec<ActivityEvent> = (0..20)
            .map(|i| event(ActivityKind::TaskCreated, &format!("t{i}"), at(8, i)))
            .collect();

        let feed = merge_feed(vec![many], 15);
        assert_eq!(feed.len(), 15);

        // The 15 newest survive.
        assert_eq!(feed[0].primary_subject, "t19");
        assert_eq!(feed[14].primary_subject, "t5");
    }

    #[test]
    fn test_merge_shorter_than_limit() {
        let feed = merge_feed(
            vec![vec![event(ActivityKind::ProjectCreated, "only", at(9, 0))]],
            15,
        );
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_equal_timestamps_keep_stream_order() {
        // Streams are concatenated projects, completions, creations; the
        // stable sort preserves that order for ties.
        let ts = at(12, 0);
        let feed = merge_feed(
            vec![
                vec![event(ActivityKind::ProjectCreated, "p", ts)],
                vec![event(ActivityKind::TaskCompleted, "done", ts)],
                vec![event(ActivityKind::TaskCreated, "new", ts)],
            ],
            15,
        );

        let kinds: Vec<ActivityKind> = feed.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::ProjectCreated,
                ActivityKind::TaskCompleted,
                ActivityKind::TaskCreated,
            ]
        );
    }

    #[test]
    fn test_event_serialization() {
        let e = event(ActivityKind::TaskCompleted, "Ship it", at(10, 30));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["activity_type"], "task_completed");
        assert_eq!(json["primary_subject"], "Ship it");
        assert_eq!(json["actor"], "ada");
    }
}
