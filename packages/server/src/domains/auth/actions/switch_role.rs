//! Role switch action

use crate::common::auth::{Actor, AuthError};
use crate::domains::auth::actions::login::issue_session;
use crate::domains::auth::actions::LoginOutcome;
use crate::domains::auth::roles::{is_known_role, ROLE_ADMIN};
use crate::domains::auth::Claims;
use crate::kernel::ServerDeps;

/// Re-issue the caller's token with a different active role.
///
/// No password re-check: the caller is already authenticated, and the new
/// token carries the same permission snapshot. The target role must come
/// from the fixed vocabulary and the caller must hold `admin`. (The UI
/// exposes a role switcher to every signed-in user; whether the admin
/// gate is intended is tracked in DESIGN.md.)
pub async fn switch_role(
    claims: &Claims,
    new_role: &str,
    deps: &ServerDeps,
) -> Result<LoginOutcome, AuthError> {
    if !is_known_role(new_role) {
        return Err(AuthError::Malformed(format!("unknown role '{}'", new_role)));
    }

    Actor::new(&claims.sub, &claims.permissions)
        .require([ROLE_ADMIN])
        .check_all()?;

    issue_session(&claims.sub, claims.permissions.clone(), Some(new_role), deps).await
}
