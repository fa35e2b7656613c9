//! User profile endpoint, gated by the self-or-admin predicate pair.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::common::auth::{Actor, AuthError};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// Fetch a user record. Callers may read their own record; admins may
/// read anyone's.
pub async fn user_profile_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(user_id): Path<String>,
) -> Result<Response, AuthError> {
    let Some(Extension(user)) = auth else {
        return Err(AuthError::AuthenticationRequired);
    };

    Actor::new(&user.user_id, &user.claims.permissions)
        .require(["self", "admin"])
        .target(&user_id)
        .check_any()?;

    let record = state.deps.users.get(&user_id).await.ok_or(AuthError::NotFound)?;
    Ok((StatusCode::OK, Json(record)).into_response())
}
