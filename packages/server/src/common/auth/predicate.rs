use std::collections::HashSet;

use crate::common::auth::AuthError;
use crate::domains::auth::roles::ROLE_VOCABULARY;

/// A permission requirement attached to a protected operation.
///
/// The wire vocabulary is kept from the route definitions: a plain token
/// names a role or extension permission, `allauth` accepts any role from
/// the fixed vocabulary, and `self` restricts the operation to the
/// caller's own records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// A literal permission token (role or free-form extension).
    Role(String),
    /// Satisfied by any token from the fixed role vocabulary.
    AnyRole,
    /// Satisfied only when the target user id equals the caller's.
    SelfOnly,
}

impl Predicate {
    pub fn parse(token: &str) -> Self {
        match token {
            "allauth" => Predicate::AnyRole,
            "self" => Predicate::SelfOnly,
            other => Predicate::Role(other.to_string()),
        }
    }

    /// The wire token this predicate was parsed from.
    pub fn token(&self) -> &str {
        match self {
            Predicate::Role(token) => token,
            Predicate::AnyRole => "allauth",
            Predicate::SelfOnly => "self",
        }
    }
}

/// Request-scoped inputs a predicate may be expanded against.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// The authenticated caller's user id.
    pub caller_id: &'a str,
    /// Target user id supplied by the route (path or query), if any.
    pub target_user_id: Option<&'a str>,
}

/// Result of expanding one predicate against an evaluation context.
///
/// Expansion runs before evaluation so the decision step only ever checks
/// concrete tokens, plus the two degenerate cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Satisfied iff the caller holds at least one of these tokens.
    Tokens(Vec<String>),
    /// Satisfied regardless of the caller's permission set.
    Granted,
    /// Never satisfiable; forces denial under require-all.
    Unsatisfiable,
}

pub fn expand(predicate: &Predicate, ctx: &EvalContext<'_>) -> Expansion {
    match predicate {
        Predicate::Role(token) => Expansion::Tokens(vec![token.clone()]),
        Predicate::AnyRole => {
            Expansion::Tokens(ROLE_VOCABULARY.iter().map(|r| r.to_string()).collect())
        }
        Predicate::SelfOnly => match ctx.target_user_id {
            Some(target) if target == ctx.caller_id => Expansion::Granted,
            _ => Expansion::Unsatisfiable,
        },
    }
}

fn satisfied(expansion: &Expansion, held: &HashSet<&str>) -> bool {
    match expansion {
        Expansion::Granted => true,
        Expansion::Unsatisfiable => false,
        Expansion::Tokens(tokens) => tokens.iter().any(|t| held.contains(t.as_str())),
    }
}

/// Evaluate a permission requirement against a caller's permission set.
///
/// With `require_all` every predicate must be satisfied; otherwise one
/// satisfied predicate suffices. An empty requirement list always allows:
/// the operation is public.
pub fn authorize(
    caller_permissions: &[String],
    required: &[Predicate],
    require_all: bool,
    ctx: &EvalContext<'_>,
) -> Result<(), AuthError> {
    if required.is_empty() {
        return Ok(());
    }

    let held: HashSet<&str> = caller_permissions.iter().map(String::as_str).collect();

    let allowed = if require_all {
        required.iter().all(|p| satisfied(&expand(p, ctx), &held))
    } else {
        required.iter().any(|p| satisfied(&expand(p, ctx), &held))
    };

    if allowed {
        Ok(())
    } else {
        let wanted = required
            .iter()
            .map(Predicate::token)
            .collect::<Vec<_>>()
            .join(", ");
        Err(AuthError::PermissionDenied(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::roles::{ROLE_ADMIN, ROLE_COMMUNITY, ROLE_MERCHANT};

    fn perms(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn ctx<'a>(caller: &'a str, target: Option<&'a str>) -> EvalContext<'a> {
        EvalContext {
            caller_id: caller,
            target_user_id: target,
        }
    }

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!(Predicate::parse("allauth"), Predicate::AnyRole);
        assert_eq!(Predicate::parse("self"), Predicate::SelfOnly);
        assert_eq!(
            Predicate::parse("merchant"),
            Predicate::Role("merchant".to_string())
        );
    }

    #[test]
    fn test_empty_requirement_allows() {
        let result = authorize(&perms(&[]), &[], true, &ctx("u1", None));
        assert!(result.is_ok());
    }

    #[test]
    fn test_literal_token() {
        let required = [Predicate::parse("merchant")];
        assert!(authorize(&perms(&["merchant"]), &required, true, &ctx("u1", None)).is_ok());
        assert!(authorize(&perms(&["community"]), &required, true, &ctx("u1", None)).is_err());
    }

    #[test]
    fn test_extension_token() {
        let required = [Predicate::parse("vendor-analytics")];
        assert!(
            authorize(&perms(&["vendor-analytics"]), &required, true, &ctx("u1", None)).is_ok()
        );
        assert!(authorize(&perms(&["merchant"]), &required, true, &ctx("u1", None)).is_err());
    }

    #[test]
    fn test_allauth_accepts_each_role() {
        let required = [Predicate::parse("allauth")];
        for role in [ROLE_ADMIN, ROLE_MERCHANT, ROLE_COMMUNITY] {
            assert!(
                authorize(&perms(&[role]), &required, false, &ctx("u1", None)).is_ok(),
                "allauth should accept role {}",
                role
            );
        }
    }

    #[test]
    fn test_allauth_rejects_extension_only_caller() {
        let required = [Predicate::parse("allauth")];
        let result = authorize(&perms(&["vendor-analytics"]), &required, false, &ctx("u1", None));
        assert!(result.is_err());
    }

    #[test]
    fn test_admin_denied_for_community_caller() {
        let required = [Predicate::parse("admin")];
        assert!(authorize(&perms(&["community"]), &required, true, &ctx("u1", None)).is_err());
    }

    #[test]
    fn test_self_matching_target() {
        let required = [Predicate::parse("self")];
        assert!(authorize(&perms(&[]), &required, true, &ctx("u1", Some("u1"))).is_ok());
    }

    #[test]
    fn test_self_non_matching_target() {
        let required = [Predicate::parse("self")];
        assert!(authorize(&perms(&["admin"]), &required, true, &ctx("u1", Some("u2"))).is_err());
    }

    #[test]
    fn test_self_without_target_denies() {
        let required = [Predicate::parse("self")];
        assert!(authorize(&perms(&["admin"]), &required, true, &ctx("u1", None)).is_err());
    }

    #[test]
    fn test_require_all_with_unsatisfiable_self() {
        // A non-matching `self` poisons the conjunction even if the other
        // predicate holds.
        let required = [Predicate::parse("self"), Predicate::parse("merchant")];
        let result = authorize(
            &perms(&["merchant"]),
            &required,
            true,
            &ctx("u1", Some("u2")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_require_all_satisfied() {
        let required = [Predicate::parse("self"), Predicate::parse("merchant")];
        let result = authorize(
            &perms(&["merchant"]),
            &required,
            true,
            &ctx("u1", Some("u1")),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_require_any_falls_back_to_admin() {
        // Admin inspecting someone else's record: `self` fails but the
        // disjunction admits `admin`.
        let required = [Predicate::parse("self"), Predicate::parse("admin")];
        let result = authorize(&perms(&["admin"]), &required, false, &ctx("u1", Some("u2")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_require_any_all_fail() {
        let required = [Predicate::parse("self"), Predicate::parse("admin")];
        let result = authorize(
            &perms(&["community"]),
            &required,
            false,
            &ctx("u1", Some("u2")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expansion_of_allauth_lists_vocabulary() {
        let expansion = expand(&Predicate::AnyRole, &ctx("u1", None));
        match expansion {
            Expansion::Tokens(tokens) => {
                assert_eq!(tokens.len(), ROLE_VOCABULARY.len());
                assert!(tokens.contains(&ROLE_ADMIN.to_string()));
            }
            other => panic!("expected token expansion, got {:?}", other),
        }
    }
}
