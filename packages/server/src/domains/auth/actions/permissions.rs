//! Permission grant/revoke actions
//!
//! Grants and revocations land in the credential store only: tokens
//! already in flight keep their snapshot until the next issuance.

use tracing::info;

use crate::common::auth::{Actor, AuthError};
use crate::domains::auth::models::UserRecord;
use crate::domains::auth::roles::ROLE_ADMIN;
use crate::domains::auth::Claims;
use crate::kernel::ServerDeps;

/// Grant a permission token to a user. Admin only.
pub async fn grant_permission(
    actor: &Claims,
    user_id: &str,
    permission: &str,
    deps: &ServerDeps,
) -> Result<UserRecord, AuthError> {
    Actor::new(&actor.sub, &actor.permissions)
        .require([ROLE_ADMIN])
        .check_all()?;

    if permission.is_empty() {
        return Err(AuthError::Malformed("a permission token is required".to_string()));
    }

    let record = deps.users.grant_permission(user_id, permission).await?;
    info!(user_id = %user_id, permission = %permission, granted_by = %actor.sub, "permission granted");
    Ok(record)
}

/// Revoke a permission token from a user. Admin only.
pub async fn revoke_permission(
    actor: &Claims,
    user_id: &str,
    permission: &str,
    deps: &ServerDeps,
) -> Result<UserRecord, AuthError> {
    Actor::new(&actor.sub, &actor.permissions)
        .require([ROLE_ADMIN])
        .check_all()?;

    let record = deps.users.revoke_permission(user_id, permission).await?;
    info!(user_id = %user_id, permission = %permission, revoked_by = %actor.sub, "permission revoked");
    Ok(record)
}
