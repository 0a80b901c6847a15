/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `focus`: Focus-session lifecycle and history
/// - `objectives`: Focus-objective checklist items
/// - `analytics`: Dashboard summary metrics
/// - `activity`: Merged recent-activity feed
/// - `stats`: Per-user focus statistics

pub mod activity;
pub mod analytics;
pub mod focus;
pub mod health;
pub mod objectives;
pub mod stats;
