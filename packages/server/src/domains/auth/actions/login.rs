//! Login action

use tracing::{debug, info};

use crate::common::auth::AuthError;
use crate::domains::auth::jwt::LOGIN_TOKEN_TTL_SECS;
use crate::domains::auth::password::verify_password;
use crate::domains::auth::roles::derive_active_role;
use crate::kernel::ServerDeps;
use crate::server::auth::{CredentialSource, SessionEntry};

/// Result of a successful credential issuance
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: String,
    pub active_role: String,
}

/// Authenticate an email/password pair and issue a session token.
///
/// Unknown email and wrong password collapse into the same error so a
/// caller cannot probe which addresses are registered.
pub async fn login(
    email: &str,
    password: &str,
    deps: &ServerDeps,
) -> Result<LoginOutcome, AuthError> {
    let email = email.trim().to_lowercase();

    let Some(user) = deps.users.find_by_email(&email).await else {
        debug!("login attempt for unknown email");
        return Err(AuthError::InvalidCredential);
    };

    if !verify_password(password, &user.password_hash) {
        debug!(user_id = %user.user_id, "password verification failed");
        return Err(AuthError::InvalidCredential);
    }

    issue_session(&user.user_id, user.permissions.clone(), None, deps).await
}

/// Issue a fresh one-hour token for an authenticated user and promote it
/// into the session cache, so requests in the same session resolve
/// without re-verifying a carrier.
///
/// Shared by login, role switching, and recovery: every issuance path
/// derives the active role through the same function.
pub(crate) async fn issue_session(
    user_id: &str,
    permissions: Vec<String>,
    explicit_role: Option<&str>,
    deps: &ServerDeps,
) -> Result<LoginOutcome, AuthError> {
    let active_role = derive_active_role(explicit_role, &permissions);

    let claims = deps.jwt_service.claims_for(
        user_id,
        permissions,
        active_role.clone(),
        LOGIN_TOKEN_TTL_SECS,
    );
    let token = deps.jwt_service.sign(&claims).map_err(AuthError::Internal)?;

    deps.sessions
        .store(SessionEntry {
            claims,
            raw_token: token.clone(),
            source: CredentialSource::Cache,
        })
        .await;

    info!(user_id = %user_id, role = %active_role, "session issued");

    Ok(LoginOutcome {
        token,
        user_id: user_id.to_string(),
        active_role,
    })
}
