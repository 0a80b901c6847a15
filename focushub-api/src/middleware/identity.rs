/// Identity resolution middleware
///
/// FocusHub's core takes an explicit [`Identity`] value on every call; this
/// middleware produces it. Authentication itself happens upstream (an
/// out-of-scope boundary such as a session-cookie gateway or reverse
/// proxy); the boundary forwards the authenticated user ID in the
/// `X-User-Id` header and this layer loads the user row to resolve the
/// role. Requests without a resolvable identity never reach a handler.
///
/// # Request Extensions
///
/// After successful resolution the middleware adds:
/// - `Identity`: user_id, username, and role
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use focushub_core::identity::Identity;
///
/// async fn handler(Extension(identity): Extension<Identity>) -> String {
///     format!("Hello, {}!", identity.username)
/// }
/// ```

use axum::{extract::Request, middleware::Next, response::Response};
use focushub_core::identity::Identity;
use focushub_core::models::user::User;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the authenticated user ID from the boundary
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolves the caller identity and injects it into request extensions
///
/// # Errors
///
/// - 401 when the header is missing or names an unknown user
/// - 400 when the header is not a UUID
pub async fn identity_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing caller identity".to_string()))?;

    let user_id = Uuid::parse_str(raw)
        .map_err(|_| ApiError::BadRequest("Malformed user ID".to_string()))?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    let identity = Identity::new(user.id, user.username, user.role);
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
