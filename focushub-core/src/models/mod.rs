/// Database models
///
/// Each model owns its table's SQL operations as static methods taking a
/// `&PgPool`, returning `Result<_, sqlx::Error>`. Higher-level components
/// (tracker, analytics, activity, stats) compose these operations and add
/// policy and domain errors on top.

pub mod focus_objective;
pub mod focus_session;
pub mod project;
pub mod task;
pub mod user;

pub use focus_objective::FocusObjective;
pub use focus_session::FocusSession;
pub use project::Project;
pub use task::Task;
pub use user::User;
