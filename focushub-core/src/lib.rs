//! # FocusHub Core Library
//!
//! Shared models and business logic for the FocusHub productivity tracker:
//! the focus-session lifecycle state machine and the time-windowed
//! analytics and activity aggregation built on top of it.
//!
//! ## Module Organization
//!
//! - `models`: Database records and their SQL operations
//! - `db`: Connection pool and migrations
//! - `identity`: Explicit caller identity and the mutation policy
//! - `window`: Date windows scoping aggregate computations
//! - `tracker`: Focus-session state machine (start/end/discard/pause)
//! - `analytics`: Dashboard summary metrics
//! - `activity`: Merged recent-activity feed
//! - `stats`: Per-user focus statistics

pub mod activity;
pub mod analytics;
pub mod db;
pub mod identity;
pub mod models;
pub mod stats;
pub mod tracker;
pub mod window;

/// Current version of the FocusHub core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
