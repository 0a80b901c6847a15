/// Integration tests for analytics, stats, and the activity feed
///
/// Run with: cargo test --test aggregation_tests
/// Requires DATABASE_URL pointing at a migrated test database.

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::TestContext;
use focushub_core::activity::{ActivityFeedMerger, RECENT_ACTIVITY_ITEMS_LIMIT};
use focushub_core::analytics::AnalyticsAggregator;
use focushub_core::models::focus_objective::FocusObjective;
use focushub_core::models::project::{CreateProject, Project};
use focushub_core::models::task::{CreateTask, Task};
use focushub_core::stats::StatsReporter;
use focushub_core::window::DateWindow;
use sqlx::PgPool;
use uuid::Uuid;

/// Creates a project, backdating its creation time
async fn seed_project(
    db: &PgPool,
    title: &str,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
) -> Uuid {
    let project = Project::create(
        db,
        CreateProject {
            title: title.to_string(),
            created_by,
        },
    )
    .await
    .unwrap();

    sqlx::query("UPDATE projects SET created_at = $2 WHERE id = $1")
        .bind(project.id)
        .bind(created_at)
        .execute(db)
        .await
        .unwrap();

    project.id
}

/// Creates a task, optionally completing it, then backdates its timestamps
async fn seed_task(
    db: &PgPool,
    title: &str,
    project_id: Option<Uuid>,
    assigned_to: Option<Uuid>,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> Uuid {
    let task = Task::create(
        db,
        CreateTask {
            project_id,
            title: title.to_string(),
            assigned_to,
            created_by,
            due_date: None,
        },
    )
    .await
    .unwrap();

    if completed_at.is_some() {
        let completed = Task::complete(db, task.id).await.unwrap().unwrap();
        assert_eq!(completed.status, "completed");
        assert!(completed.completed_at.is_some());
    }

    sqlx::query("UPDATE tasks SET created_at = $2, completed_at = $3 WHERE id = $1")
        .bind(task.id)
        .bind(created_at)
        .bind(completed_at)
        .execute(db)
        .await
        .unwrap();

    task.id
}

/// Creates an objective, backdating its creation time
async fn seed_objective(db: &PgPool, task_id: Uuid, completed: bool, created_at: DateTime<Utc>) {
    let objective = FocusObjective::create(db, task_id, "objective", completed)
        .await
        .unwrap();

    sqlx::query("UPDATE focus_objectives SET created_at = $2 WHERE id = $1")
        .bind(objective.id)
        .bind(created_at)
        .execute(db)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_focus_minutes_sums_closed_sessions_in_default_window() {
    let ctx = TestContext::new().await.unwrap();
    let aggregator = AnalyticsAggregator::new(ctx.db.clone());

    let now = Utc::now();
    ctx.seed_closed_session(now - Duration::days(1), 600)
        .await
        .unwrap();
    ctx.seed_closed_session(now - Duration::days(2), 1200)
        .await
        .unwrap();
    // Outside the default 7-day window.
    ctx.seed_closed_session(now - Duration::days(10), 3600)
        .await
        .unwrap();

    let window = DateWindow::resolve(None, None).unwrap();
    let summary = aggregator.summary(ctx.user.id, window).await.unwrap();

    assert_eq!(summary.focus_minutes_this_week, 30);
    assert_eq!(summary.productivity_change, 0);
}

#[tokio::test]
async fn test_closing_a_session_adds_its_rounded_minutes() {
    let ctx = TestContext::new().await.unwrap();
    let aggregator = AnalyticsAggregator::new(ctx.db.clone());
    let window = DateWindow::resolve(None, None).unwrap();

    let before = aggregator.summary(ctx.user.id, window).await.unwrap();

    ctx.seed_closed_session(Utc::now() - Duration::hours(1), 750)
        .await
        .unwrap();

    let after = aggregator.summary(ctx.user.id, window).await.unwrap();
    // 750s rounds to 13 minutes.
    assert_eq!(
        after.focus_minutes_this_week,
        before.focus_minutes_this_week + 13
    );
}

#[tokio::test]
async fn test_explicit_window_includes_entire_end_day() {
    let ctx = TestContext::new().await.unwrap();
    let aggregator = AnalyticsAggregator::new(ctx.db.clone());

    let inside = Utc.with_ymd_and_hms(2024, 1, 7, 23, 59, 59).unwrap();
    let outside = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();

    seed_task(
        &ctx.db,
        "inside window",
        None,
        Some(ctx.user.id),
        Some(ctx.user.id),
        inside - Duration::days(1),
        Some(inside),
    )
    .await;
    seed_task(
        &ctx.db,
        "outside window",
        None,
        Some(ctx.user.id),
        Some(ctx.user.id),
        outside - Duration::days(1),
        Some(outside),
    )
    .await;

    let window = DateWindow::resolve(Some("2024-01-01"), Some("2024-01-07")).unwrap();
    let summary = aggregator.summary(ctx.user.id, window).await.unwrap();

    assert_eq!(summary.completed_this_week, 1);
}

#[tokio::test]
async fn test_objectives_and_collaborative_projects() {
    let ctx = TestContext::new().await.unwrap();
    let aggregator = AnalyticsAggregator::new(ctx.db.clone());

    let now = Utc::now();
    seed_objective(&ctx.db, ctx.task.id, true, now - Duration::days(1)).await;
    seed_objective(&ctx.db, ctx.task.id, false, now - Duration::days(1)).await;
    seed_objective(&ctx.db, ctx.task.id, true, now - Duration::days(20)).await;

    // A project whose tasks are assigned to two distinct users.
    let other = focushub_core::models::user::User::create(
        &ctx.db,
        focushub_core::models::user::CreateUser {
            username: format!("other-{}", Uuid::new_v4()),
            role: focushub_core::identity::Role::Collaborator,
        },
    )
    .await
    .unwrap();

    let shared = seed_project(&ctx.db, "shared", Some(ctx.user.id), now).await;
    seed_task(&ctx.db, "mine", Some(shared), Some(ctx.user.id), None, now, None).await;
    seed_task(&ctx.db, "theirs", Some(shared), Some(other.id), None, now, None).await;

    let window = DateWindow::resolve(None, None).unwrap();
    let summary = aggregator.summary(ctx.user.id, window).await.unwrap();

    // Only the completed objective inside the window counts.
    assert_eq!(summary.objectives_completed_this_week, 1);
    assert!(summary.collaborative_projects_count >= 1);
}

#[tokio::test]
async fn test_feed_cutoff_limit_and_ordering() {
    let ctx = TestContext::new().await.unwrap();
    let merger = ActivityFeedMerger::new(ctx.db.clone());

    let now = Utc::now();

    // Three projects created two days ago: excluded by the 1-day cutoff.
    for i in 0..3 {
        seed_project(
            &ctx.db,
            &format!("old project {i}"),
            Some(ctx.user.id),
            now - Duration::days(2),
        )
        .await;
    }

    // One task completed an hour ago.
    seed_task(
        &ctx.db,
        "finished yesterday",
        None,
        Some(ctx.user.id),
        Some(ctx.user.id),
        now - Duration::days(3),
        Some(now - Duration::hours(1)),
    )
    .await;

    // Twenty tasks created just now.
    for i in 0..20 {
        seed_task(
            &ctx.db,
            &format!("new task {i}"),
            None,
            None,
            Some(ctx.user.id),
            now - Duration::minutes(i),
            None,
        )
        .await;
    }

    let feed = merger.recent().await.unwrap();

    assert_eq!(feed.len(), RECENT_ACTIVITY_ITEMS_LIMIT);

    // The feed is global, so only assert about this test's own rows: the
    // stale projects must not survive the cutoff.
    let cutoff = now - Duration::days(1);
    for event in &feed {
        assert!(event.timestamp >= cutoff);
        assert!(!event.primary_subject.starts_with("old project"));
    }

    // Strictly non-increasing by timestamp.
    for pair in feed.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

#[tokio::test]
async fn test_feed_actor_falls_back_to_system() {
    let ctx = TestContext::new().await.unwrap();
    let merger = ActivityFeedMerger::new(ctx.db.clone());

    let title = format!("orphan project {}", Uuid::new_v4());
    seed_project(&ctx.db, &title, None, Utc::now()).await;

    let feed = merger.recent().await.unwrap();
    let event = feed
        .iter()
        .find(|e| e.primary_subject == title)
        .expect("orphan project should appear in the feed");
    assert_eq!(event.actor, "System");
}

#[tokio::test]
async fn test_stats_report() {
    let ctx = TestContext::new().await.unwrap();
    let reporter = StatsReporter::new(ctx.db.clone());

    let now = Utc::now();
    ctx.seed_closed_session(now - Duration::days(1), 600)
        .await
        .unwrap();
    ctx.seed_closed_session(now - Duration::days(2), 1200)
        .await
        .unwrap();

    seed_objective(&ctx.db, ctx.task.id, true, now - Duration::days(1)).await;
    seed_objective(&ctx.db, ctx.task.id, false, now - Duration::days(1)).await;

    let stats = reporter.report(ctx.user.id, None).await.unwrap();

    assert_eq!(stats.period_days, 30);
    assert_eq!(stats.total_focus_minutes, 30);
    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.avg_session_duration, 15);
    assert_eq!(stats.total_objectives, 2);
    assert_eq!(stats.completed_objectives, 1);
    assert_eq!(stats.objective_completion_rate, 50);

    assert_eq!(stats.top_focused_tasks.len(), 1);
    assert_eq!(stats.top_focused_tasks[0].task_id, ctx.task.id);
    assert_eq!(stats.top_focused_tasks[0].total_seconds, 1800);
    assert_eq!(stats.top_focused_tasks[0].session_count, 2);

    assert!(!stats.daily_distribution.is_empty());
    let day_seconds: i64 = stats.daily_distribution.iter().map(|d| d.total_seconds).sum();
    assert_eq!(day_seconds, 1800);
}

#[tokio::test]
async fn test_stats_report_empty_window_is_zeroed() {
    let ctx = TestContext::new().await.unwrap();
    let reporter = StatsReporter::new(ctx.db.clone());

    let stats = reporter.report(ctx.user.id, Some(30)).await.unwrap();

    assert_eq!(stats.total_focus_minutes, 0);
    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.avg_session_duration, 0);
    assert_eq!(stats.objective_completion_rate, 0);
    assert!(stats.top_focused_tasks.is_empty());
    assert!(stats.daily_distribution.is_empty());
}

#[tokio::test]
async fn test_objective_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    let objective = FocusObjective::create(&ctx.db, ctx.task.id, "Outline the report", false)
        .await
        .unwrap();
    assert!(!objective.completed);

    let listed = FocusObjective::list_for_task(&ctx.db, ctx.task.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].objective_text, "Outline the report");

    // Completing leaves the text untouched.
    let completed = FocusObjective::update(&ctx.db, objective.id, None, Some(true))
        .await
        .unwrap()
        .unwrap();
    assert!(completed.completed);
    assert_eq!(completed.objective_text, "Outline the report");

    let renamed = FocusObjective::update(&ctx.db, objective.id, Some("Draft the report"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.objective_text, "Draft the report");
    assert!(renamed.completed);

    assert!(FocusObjective::delete(&ctx.db, objective.id).await.unwrap());
    assert!(FocusObjective::list_for_task(&ctx.db, ctx.task.id)
        .await
        .unwrap()
        .is_empty());

    // A second delete finds nothing.
    assert!(!FocusObjective::delete(&ctx.db, objective.id).await.unwrap());

    let missing = FocusObjective::update(&ctx.db, objective.id, None, Some(false))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_project_delete_cascades_focus_data() {
    let ctx = TestContext::new().await.unwrap();

    let now = Utc::now();
    let project = seed_project(&ctx.db, "doomed", Some(ctx.user.id), now).await;
    let task = seed_task(
        &ctx.db,
        "doomed task",
        Some(project),
        Some(ctx.user.id),
        Some(ctx.user.id),
        now,
        None,
    )
    .await;

    sqlx::query(
        r#"
        INSERT INTO focus_sessions (user_id, task_id, start_time, end_time, duration_seconds)
        VALUES ($1, $2, NOW() - INTERVAL '10 minutes', NOW(), 600)
        "#,
    )
    .bind(ctx.user.id)
    .bind(task)
    .execute(&ctx.db)
    .await
    .unwrap();
    seed_objective(&ctx.db, task, false, now).await;

    let deleted = Project::delete(&ctx.db, project).await.unwrap();
    assert!(deleted);

    assert!(Project::find_by_id(&ctx.db, project).await.unwrap().is_none());
    assert!(Task::find_by_id(&ctx.db, task).await.unwrap().is_none());

    // No session or objective may reference the deleted task.
    let (sessions,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM focus_sessions WHERE task_id = $1")
            .bind(task)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    let (objectives,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM focus_objectives WHERE task_id = $1")
            .bind(task)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(sessions, 0);
    assert_eq!(objectives, 0);
}
