/// Authorization module for Town Market
///
/// Provides a fluent API for permission checks in handler code:
///
/// ```ignore
/// use crate::common::auth::{Actor, Predicate};
///
/// // In a handler:
/// Actor::new(&claims.sub, &claims.permissions)
///     .require(["self", "admin"])
///     .target(&target_user_id)
///     .check_any()?;
/// ```
///
/// Requirements are expanded into concrete tokens before evaluation, so
/// the decision step is a plain set check and stays exhaustively testable.

mod builder;
mod errors;
mod predicate;

pub use builder::Actor;
pub use errors::AuthError;
pub use predicate::{authorize, expand, EvalContext, Expansion, Predicate};
