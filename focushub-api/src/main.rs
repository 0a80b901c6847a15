//! # FocusHub API Server
//!
//! This is the main API server for FocusHub, a productivity tracker built
//! around focus sessions, objectives, and workspace activity.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Focus-session lifecycle endpoints (start, end, pause, discard)
//! - Dashboard analytics over a date window
//! - A merged recent-activity feed
//! - Per-user focus statistics
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p focushub-api
//! ```

use focushub_api::{
    app::{build_router, AppState},
    config::Config,
};
use focushub_core::db::migrations::run_migrations;
use focushub_core::db::{close_pool, create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focushub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "FocusHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let state = AppState::new(pool.clone(), config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    close_pool(pool).await;

    Ok(())
}
