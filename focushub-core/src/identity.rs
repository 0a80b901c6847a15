/// Caller identity and mutation policy
///
/// Every core operation receives an explicit [`Identity`] value supplied by
/// the request boundary. There is no ambient session state: the boundary
/// authenticates the caller (out of scope here) and hands the resolved
/// identity down.
///
/// # Roles
///
/// - **administrator**: Full control over all data
/// - **collaborator**: Default role, can mutate own-scoped data
/// - **guest**: Read-only for every mutating operation system-wide
///
/// # Example
///
/// ```
/// use focushub_core::identity::{Identity, Role};
/// use uuid::Uuid;
///
/// let caller = Identity::new(Uuid::new_v4(), "ada".to_string(), Role::Guest);
/// assert!(!caller.role.can_mutate());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control over all data and users
    Administrator,

    /// Default role: can create and mutate own-scoped data
    Collaborator,

    /// Read-only access; every mutating operation is denied
    Guest,
}

impl Role {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Collaborator => "collaborator",
            Role::Guest => "guest",
        }
    }

    /// Single centralized policy check applied before any mutating
    /// operation. Guests are read-only; everyone else may mutate.
    pub fn can_mutate(&self) -> bool {
        !matches!(self, Role::Guest)
    }
}

/// Resolved caller identity passed into every core operation
///
/// Produced by the boundary's identity middleware from the users table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username, used as the display actor in feeds and logs
    pub username: String,

    /// Role driving the mutation policy
    pub role: Role,
}

impl Identity {
    /// Creates a new identity value
    pub fn new(user_id: Uuid, username: String, role: Role) -> Self {
        Self {
            user_id,
            username,
            role,
        }
    }

    /// Returns an error unless this identity is allowed to mutate
    pub fn require_mutate(&self) -> Result<(), PolicyError> {
        if self.role.can_mutate() {
            Ok(())
        } else {
            Err(PolicyError::ReadOnlyRole(self.role))
        }
    }
}

/// Error type for policy checks
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The caller's role is read-only
    #[error("Role {0:?} is read-only and cannot perform mutating operations")]
    ReadOnlyRole(Role),
}
