/// Integration tests for the focus-session state machine
///
/// These tests verify the active-session invariant and the lifecycle
/// operations against a real PostgreSQL database.
///
/// Run with: cargo test --test tracker_tests
/// Requires DATABASE_URL pointing at a migrated test database.

mod common;

use chrono::{Duration, Utc};
use common::TestContext;
use focushub_core::tracker::{SessionTracker, TrackerError};

#[tokio::test]
async fn test_start_and_end_session() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());
    let caller = ctx.identity();

    let started = tracker.start(&caller, ctx.task.id).await.unwrap();
    assert_eq!(started.task_id, ctx.task.id);
    assert_eq!(ctx.open_session_count().await.unwrap(), 1);

    let closed = tracker.end(&caller).await.unwrap();
    assert_eq!(closed.session_id, started.session_id);
    assert!(closed.duration_seconds >= 0);
    assert_eq!(ctx.open_session_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_second_start_conflicts_and_creates_no_row() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());
    let caller = ctx.identity();

    tracker.start(&caller, ctx.task.id).await.unwrap();

    let second = tracker.start(&caller, ctx.task.id).await;
    assert!(matches!(second, Err(TrackerError::SessionAlreadyActive)));

    // Exactly one row remains open; the state did not change.
    assert_eq!(ctx.open_session_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_end_while_idle_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());
    let caller = ctx.identity();

    let result = tracker.end(&caller).await;
    assert!(matches!(result, Err(TrackerError::NoActiveSession)));
}

#[tokio::test]
async fn test_discard_while_idle_is_noop_success() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());
    let caller = ctx.identity();

    let result = tracker.discard(&caller).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_discard_closes_and_preserves_focus_time() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());
    let caller = ctx.identity();

    let started = tracker.start(&caller, ctx.task.id).await.unwrap();

    let discarded = tracker.discard(&caller).await.unwrap().unwrap();
    assert_eq!(discarded.session_id, started.session_id);
    assert_eq!(ctx.open_session_count().await.unwrap(), 0);

    // The session row survives with its duration recorded, so the focus
    // time still feeds the analytics.
    let (duration,): (Option<i64>,) =
        sqlx::query_as("SELECT duration_seconds FROM focus_sessions WHERE id = $1")
            .bind(started.session_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(duration, Some(discarded.duration_seconds));
}

#[tokio::test]
async fn test_pause_closes_like_end() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());
    let caller = ctx.identity();

    let started = tracker.start(&caller, ctx.task.id).await.unwrap();

    let paused = tracker.pause(&caller).await.unwrap();
    assert_eq!(paused.session_id, started.session_id);
    assert_eq!(ctx.open_session_count().await.unwrap(), 0);

    // There is no resume: pausing again errors like end-while-idle.
    let again = tracker.pause(&caller).await;
    assert!(matches!(again, Err(TrackerError::NoActiveSession)));
}

#[tokio::test]
async fn test_active_reflects_state() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());
    let caller = ctx.identity();

    assert!(tracker.active(caller.user_id).await.unwrap().is_none());

    let started = tracker.start(&caller, ctx.task.id).await.unwrap();
    let active = tracker.active(caller.user_id).await.unwrap().unwrap();
    assert_eq!(active.session_id, started.session_id);
    assert_eq!(active.task_id, ctx.task.id);

    tracker.end(&caller).await.unwrap();
    assert!(tracker.active(caller.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_closed_duration_matches_recorded_interval() {
    let ctx = TestContext::new().await.unwrap();

    let start = Utc::now() - Duration::seconds(754);
    let id = ctx.seed_closed_session(start, 754).await.unwrap();

    let (start_time, end_time, duration): (
        chrono::DateTime<Utc>,
        chrono::DateTime<Utc>,
        i64,
    ) = sqlx::query_as(
        "SELECT start_time, end_time, duration_seconds FROM focus_sessions WHERE id = $1",
    )
    .bind(id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();

    assert_eq!((end_time - start_time).num_seconds(), duration);
    assert_eq!(duration, 754);
}

#[tokio::test]
async fn test_session_history_lists_closed_newest_first() {
    let ctx = TestContext::new().await.unwrap();
    let tracker = SessionTracker::new(ctx.db.clone());

    let now = Utc::now();
    ctx.seed_closed_session(now - Duration::hours(5), 600)
        .await
        .unwrap();
    ctx.seed_closed_session(now - Duration::hours(2), 300)
        .await
        .unwrap();
    // Outside the default 7-day lookback.
    ctx.seed_closed_session(now - Duration::days(10), 900)
        .await
        .unwrap();

    let sessions = tracker.sessions(ctx.user.id, None).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].duration_seconds, Some(300));
    assert_eq!(sessions[1].duration_seconds, Some(600));
    assert_eq!(sessions[0].duration_minutes, Some(5.0));
    assert_eq!(sessions[1].duration_minutes, Some(10.0));
    assert_eq!(sessions[0].task_title.as_deref(), Some("Test task"));
}
