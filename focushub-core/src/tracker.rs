/// Focus-session lifecycle state machine
///
/// Per user there are two states: **Idle** (no open session) and **Active**
/// (exactly one session with `end_time IS NULL`). The tracker is the only
/// writer of session start/end timestamps.
///
/// # State Machine
///
/// ```text
/// Idle   --start-->   Active
/// Active --end----->  Idle    (errors when already idle)
/// Active --discard--> Idle    (no-op success when already idle)
/// Active --pause--->  Idle    (alias for end; there is no resume)
/// ```
///
/// Closing never deletes: `discard` records the session like `end` does,
/// so accumulated focus time survives into the analytics.
///
/// # Example
///
/// ```no_run
/// use focushub_core::tracker::SessionTracker;
/// use focushub_core::identity::{Identity, Role};
/// use focushub_core::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let tracker = SessionTracker::new(pool);
/// let caller = Identity::new(Uuid::new_v4(), "ada".to_string(), Role::Collaborator);
///
/// let started = tracker.start(&caller, Uuid::new_v4()).await?;
/// let closed = tracker.end(&caller).await?;
/// assert_eq!(started.session_id, closed.session_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::identity::{Identity, PolicyError};
use crate::models::focus_session::{FocusSession, SessionWithTask};
use crate::window::DateWindow;

/// Default lookback for session history listings, in days
pub const DEFAULT_SESSION_HISTORY_DAYS: i64 = 7;

/// Error type for tracker operations
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// A session is already active for this user
    #[error("A focus session is already active")]
    SessionAlreadyActive,

    /// There is no active session to end
    #[error("No active focus session")]
    NoActiveSession,

    /// The caller's role may not mutate
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Underlying store failure
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// A freshly started session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedSession {
    /// Generated session ID
    pub session_id: Uuid,

    /// Task being focused on
    pub task_id: Uuid,

    /// Session start time
    pub start_time: DateTime<Utc>,
}

/// A closed session with its recorded duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedSessionSummary {
    /// Session ID
    pub session_id: Uuid,

    /// Duration in whole seconds (truncated)
    pub duration_seconds: i64,

    /// Duration in minutes, rounded to one decimal
    pub duration_minutes: f64,
}

/// The user's currently active session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSession {
    /// Session ID
    pub session_id: Uuid,

    /// Task being focused on
    pub task_id: Uuid,

    /// Session start time
    pub start_time: DateTime<Utc>,
}

/// Per-user focus-session state machine over the shared store
#[derive(Clone)]
pub struct SessionTracker {
    db: PgPool,
}

impl SessionTracker {
    /// Creates a tracker over a connection pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Starts a focus session on a task
    ///
    /// Requires the caller to be Idle. Concurrent starts race on the
    /// storage-level partial unique index, so at most one can succeed; the
    /// loser surfaces as [`TrackerError::SessionAlreadyActive`] and no row
    /// is created.
    ///
    /// # Errors
    ///
    /// - `Policy` if the caller's role is read-only
    /// - `SessionAlreadyActive` if a session is already open
    /// - `Storage` on store failure
    pub async fn start(
        &self,
        caller: &Identity,
        task_id: Uuid,
    ) -> Result<StartedSession, TrackerError> {
        caller.require_mutate()?;

        // Friendly pre-check; the unique index is what actually settles races.
        if FocusSession::find_active(&self.db, caller.user_id)
            .await?
            .is_some()
        {
            return Err(TrackerError::SessionAlreadyActive);
        }

        let session = match FocusSession::open(&self.db, caller.user_id, task_id).await {
            Ok(session) => session,
            Err(e) if is_unique_violation(&e) => {
                return Err(TrackerError::SessionAlreadyActive);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            user_id = %caller.user_id,
            session_id = %session.id,
            task_id = %task_id,
            "Focus session started"
        );

        Ok(StartedSession {
            session_id: session.id,
            task_id: session.task_id,
            start_time: session.start_time,
        })
    }

    /// Ends the active focus session
    ///
    /// Closes the most recently started open session, writing end time and
    /// truncated duration atomically.
    ///
    /// # Errors
    ///
    /// - `Policy` if the caller's role is read-only
    /// - `NoActiveSession` if the caller is idle
    /// - `Storage` on store failure
    pub async fn end(&self, caller: &Identity) -> Result<ClosedSessionSummary, TrackerError> {
        caller.require_mutate()?;

        let closed = self
            .close_active(caller)
            .await?
            .ok_or(TrackerError::NoActiveSession)?;

        Ok(closed)
    }

    /// Discards the active focus session
    ///
    /// Semantically this closes and records the session exactly like
    /// [`SessionTracker::end`]; the accumulated focus time must never be
    /// lost. Unlike `end`, discarding while idle is a no-op success and
    /// returns `None`.
    pub async fn discard(
        &self,
        caller: &Identity,
    ) -> Result<Option<ClosedSessionSummary>, TrackerError> {
        caller.require_mutate()?;

        let closed = self.close_active(caller).await?;
        if closed.is_none() {
            tracing::debug!(user_id = %caller.user_id, "Discard with no active session; no-op");
        }

        Ok(closed)
    }

    /// Pauses the active focus session
    ///
    /// Currently an alias for [`SessionTracker::end`]: the session is closed
    /// outright and there is no resume path.
    pub async fn pause(&self, caller: &Identity) -> Result<ClosedSessionSummary, TrackerError> {
        self.end(caller).await
    }

    /// Returns the caller's active session, or `None` when idle
    ///
    /// Never errors on absence.
    pub async fn active(&self, user_id: Uuid) -> Result<Option<ActiveSession>, TrackerError> {
        let session = FocusSession::find_active(&self.db, user_id).await?;

        Ok(session.map(|s| ActiveSession {
            session_id: s.id,
            task_id: s.task_id,
            start_time: s.start_time,
        }))
    }

    /// Lists the caller's closed sessions over the trailing `days` days
    pub async fn sessions(
        &self,
        user_id: Uuid,
        days: Option<i64>,
    ) -> Result<Vec<SessionWithTask>, TrackerError> {
        let window = DateWindow::last_days(days.unwrap_or(DEFAULT_SESSION_HISTORY_DAYS));
        let sessions = FocusSession::list_closed(&self.db, user_id, window).await?;
        Ok(sessions)
    }

    async fn close_active(
        &self,
        caller: &Identity,
    ) -> Result<Option<ClosedSessionSummary>, TrackerError> {
        let Some(session) = FocusSession::close_active(&self.db, caller.user_id).await? else {
            return Ok(None);
        };

        // Both fields were just written by the closing UPDATE.
        let duration_seconds = session.duration_seconds.unwrap_or(0);

        tracing::info!(
            user_id = %caller.user_id,
            session_id = %session.id,
            duration_seconds,
            "Focus session closed"
        );

        Ok(Some(ClosedSessionSummary {
            session_id: session.id,
            duration_seconds,
            duration_minutes: minutes_one_decimal(duration_seconds),
        }))
    }
}

/// Converts whole seconds to minutes rounded to one decimal place
pub fn minutes_one_decimal(seconds: i64) -> f64 {
    (seconds as f64 / 60.0 * 10.0).round() / 10.0
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;

    #[test]
    fn test_minutes_one_decimal() {
        assert_eq!(minutes_one_decimal(0), 0.0);
        assert_eq!(minutes_one_decimal(60), 1.0);
        assert_eq!(minutes_one_decimal(90), 1.5);
        assert_eq!(minutes_one_decimal(61), 1.0);
        assert_eq!(minutes_one_decimal(100), 1.7);
        assert_eq!(minutes_one_decimal(1500), 25.0);
    }

    #[tokio::test]
    async fn test_guest_cannot_start_session() {
        // Policy is checked before any store access, so a disconnected pool
        // never gets touched for a guest caller.
        let pool = PgPool::connect_lazy("postgresql://localhost/unused").unwrap();
        let tracker = SessionTracker::new(pool);
        let guest = Identity::new(Uuid::new_v4(), "visitor".to_string(), Role::Guest);

        let result = tracker.start(&guest, Uuid::new_v4()).await;
        assert!(matches!(result, Err(TrackerError::Policy(_))));

        let result = tracker.end(&guest).await;
        assert!(matches!(result, Err(TrackerError::Policy(_))));

        let result = tracker.discard(&guest).await;
        assert!(matches!(result, Err(TrackerError::Policy(_))));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TrackerError::SessionAlreadyActive.to_string(),
            "A focus session is already active"
        );
        assert_eq!(
            TrackerError::NoActiveSession.to_string(),
            "No active focus session"
        );
    }
}
