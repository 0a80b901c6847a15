/// Database access layer
///
/// Provides connection pool management and migration utilities.

pub mod migrations;
pub mod pool;

pub use pool::{close_pool, create_pool, health_check, DatabaseConfig};
