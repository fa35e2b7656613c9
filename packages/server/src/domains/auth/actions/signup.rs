//! Signup action

use tracing::info;

use crate::common::auth::AuthError;
use crate::domains::auth::models::UserRecord;
use crate::domains::auth::password::hash_password;
use crate::domains::auth::roles::ROLE_COMMUNITY;
use crate::kernel::ServerDeps;

/// Register a new user.
///
/// New accounts start with the community role; merchants and admins are
/// promoted later through permission grants.
pub async fn signup(
    email: &str,
    password: &str,
    phone_number: Option<String>,
    deps: &ServerDeps,
) -> Result<UserRecord, AuthError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::Malformed("a valid email is required".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Malformed("a password is required".to_string()));
    }

    let password_hash = hash_password(password).map_err(AuthError::Internal)?;
    let record = UserRecord::new(
        email,
        password_hash,
        vec![ROLE_COMMUNITY.to_string()],
        phone_number,
    );

    let record = deps.users.insert(record).await?;
    info!(user_id = %record.user_id, "user registered");
    Ok(record)
}
