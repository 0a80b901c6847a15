/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use focushub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = focushub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    routing::{get, post, put},
    Router,
};
use focushub_core::activity::ActivityFeedMerger;
use focushub_core::analytics::AnalyticsAggregator;
use focushub_core::stats::StatsReporter;
use focushub_core::tracker::SessionTracker;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// The components share the same pool, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Focus-session state machine
    pub tracker: SessionTracker,

    /// Dashboard summary metrics
    pub analytics: AnalyticsAggregator,

    /// Recent-activity feed merger
    pub activity: ActivityFeedMerger,

    /// Per-user focus statistics
    pub stats: StatsReporter,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            tracker: SessionTracker::new(db.clone()),
            analytics: AnalyticsAggregator::new(db.clone()),
            activity: ActivityFeedMerger::new(db.clone()),
            stats: StatsReporter::new(db.clone()),
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                   # Health check (public)
/// ├── /v1/                      # API v1 (identity required)
/// │   ├── /focus/
/// │   │   ├── POST /start       # Start a focus session
/// │   │   ├── POST /end         # End the active session
/// │   │   ├── POST /pause       # Pause (closes the session)
/// │   │   ├── POST /discard     # Close the session, keep its time
/// │   │   ├── GET  /active      # Active session or null
/// │   │   ├── GET  /sessions    # Closed-session history
/// │   │   └── GET  /stats       # Focus statistics
/// │   ├── /tasks/
/// │   │   ├── GET  /:task_id/objectives   # List a task's objectives
/// │   │   └── POST /:task_id/objectives   # Add an objective
/// │   ├── /objectives/
/// │   │   ├── PUT    /:id       # Update text/completed flag
/// │   │   └── DELETE /:id       # Remove an objective
/// │   ├── /analytics/
/// │   │   └── GET /summary      # Dashboard summary
/// │   └── /activity/
/// │       └── GET /recent       # Merged activity feed
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Identity resolution (everything under /v1)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no identity)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let focus_routes = Router::new()
        .route("/start", post(routes::focus::start_session))
        .route("/end", post(routes::focus::end_session))
        .route("/pause", post(routes::focus::pause_session))
        .route("/discard", post(routes::focus::discard_session))
        .route("/active", get(routes::focus::active_session))
        .route("/sessions", get(routes::focus::list_sessions))
        .route("/stats", get(routes::stats::focus_stats));

    let task_routes = Router::new().route(
        "/:task_id/objectives",
        get(routes::objectives::list_objectives).post(routes::objectives::create_objective),
    );

    let objective_routes = Router::new().route(
        "/:id",
        put(routes::objectives::update_objective).delete(routes::objectives::delete_objective),
    );

    let analytics_routes = Router::new().route("/summary", get(routes::analytics::summary));

    let activity_routes = Router::new().route("/recent", get(routes::activity::recent));

    // Everything under /v1 requires a resolvable caller identity
    let v1_routes = Router::new()
        .nest("/focus", focus_routes)
        .nest("/tasks", task_routes)
        .nest("/objectives", objective_routes)
        .nest("/analytics", analytics_routes)
        .nest("/activity", activity_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::identity::identity_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
