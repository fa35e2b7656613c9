use super::predicate::{authorize, EvalContext, Predicate};
use super::AuthError;

/// Entry point for permission checks
///
/// Usage:
/// ```ignore
/// Actor::new(&claims.sub, &claims.permissions)
///     .require(["self", "admin"])
///     .target(user_id)
///     .check_any()?;
/// ```
pub struct Actor<'a> {
    caller_id: &'a str,
    permissions: &'a [String],
}

impl<'a> Actor<'a> {
    /// Create a new actor for permission checks
    ///
    /// # Arguments
    /// * `caller_id` - The authenticated caller's user id
    /// * `permissions` - Permission snapshot from the verified claims
    pub fn new(caller_id: &'a str, permissions: &'a [String]) -> Self {
        Self {
            caller_id,
            permissions,
        }
    }

    /// Specify the predicates the operation requires
    pub fn require<I, S>(self, tokens: I) -> RequirementBuilder<'a>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RequirementBuilder {
            caller_id: self.caller_id,
            permissions: self.permissions,
            required: tokens
                .into_iter()
                .map(|t| Predicate::parse(t.as_ref()))
                .collect(),
            target_user_id: None,
        }
    }
}

/// Builder after specifying the required predicates
pub struct RequirementBuilder<'a> {
    caller_id: &'a str,
    permissions: &'a [String],
    required: Vec<Predicate>,
    target_user_id: Option<&'a str>,
}

impl<'a> RequirementBuilder<'a> {
    /// Supply the target user id a `self` predicate is matched against
    pub fn target(mut self, user_id: &'a str) -> Self {
        self.target_user_id = Some(user_id);
        self
    }

    /// Every required predicate must be satisfied
    pub fn check_all(self) -> Result<(), AuthError> {
        self.check(true)
    }

    /// At least one required predicate must be satisfied
    pub fn check_any(self) -> Result<(), AuthError> {
        self.check(false)
    }

    fn check(self, require_all: bool) -> Result<(), AuthError> {
        let ctx = EvalContext {
            caller_id: self.caller_id,
            target_user_id: self.target_user_id,
        };
        authorize(self.permissions, &self.required, require_all, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_admin_check() {
        let permissions = perms(&["admin"]);
        let result = Actor::new("u1", &permissions).require(["admin"]).check_all();
        assert!(result.is_ok());
    }

    #[test]
    fn test_non_admin_rejected() {
        let permissions = perms(&["community"]);
        let result = Actor::new("u1", &permissions).require(["admin"]).check_all();
        assert!(matches!(result, Err(AuthError::PermissionDenied(_))));
    }

    #[test]
    fn test_self_or_admin_on_own_record() {
        let permissions = perms(&["community"]);
        let result = Actor::new("u1", &permissions)
            .require(["self", "admin"])
            .target("u1")
            .check_any();
        assert!(result.is_ok());
    }

    #[test]
    fn test_self_or_admin_on_foreign_record() {
        let permissions = perms(&["community"]);
        let result = Actor::new("u1", &permissions)
            .require(["self", "admin"])
            .target("u2")
            .check_any();
        assert!(result.is_err());
    }
}
