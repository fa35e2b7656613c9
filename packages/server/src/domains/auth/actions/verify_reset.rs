//! Recovery verify action

use tracing::{debug, info};

use crate::common::auth::AuthError;
use crate::domains::auth::actions::login::issue_session;
use crate::domains::auth::actions::LoginOutcome;
use crate::domains::auth::models::OtpVerification;
use crate::domains::auth::password::hash_password;
use crate::kernel::ServerDeps;

/// Complete password recovery: consume the pending code, rotate the
/// stored hash, and sign the user in with a fresh token.
///
/// The code is consumed before the hash rotates, so a replay of the same
/// code fails with `NotFound` no matter how the rest of the flow goes.
pub async fn verify_reset(
    email: &str,
    code: &str,
    new_password: &str,
    deps: &ServerDeps,
) -> Result<LoginOutcome, AuthError> {
    let email = email.trim().to_lowercase();

    if new_password.is_empty() {
        return Err(AuthError::Malformed("a new password is required".to_string()));
    }

    let Some(user) = deps.users.find_by_email(&email).await else {
        return Err(AuthError::NotFound);
    };

    match deps.otps.verify_and_consume(&user.user_id, code).await {
        OtpVerification::Consumed => {}
        OtpVerification::NotFound => return Err(AuthError::NotFound),
        OtpVerification::Mismatch => {
            debug!(user_id = %user.user_id, "recovery code mismatch");
            return Err(AuthError::InvalidCredential);
        }
    }

    let password_hash = hash_password(new_password).map_err(AuthError::Internal)?;
    deps.users.update_password(&user.user_id, password_hash).await?;
    info!(user_id = %user.user_id, "password rotated via recovery");

    // Transparent sign-in after a successful reset
    issue_session(&user.user_id, user.permissions.clone(), None, deps).await
}
