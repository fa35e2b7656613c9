//! Role vocabulary and active-role selection.

/// Full administrative access.
pub const ROLE_ADMIN: &str = "admin";
/// Merchants operating a storefront.
pub const ROLE_MERCHANT: &str = "merchant";
/// Community members.
pub const ROLE_COMMUNITY: &str = "community";

/// The fixed role vocabulary, in precedence order.
pub const ROLE_VOCABULARY: [&str; 3] = [ROLE_ADMIN, ROLE_MERCHANT, ROLE_COMMUNITY];

/// Sentinel role for callers holding no recognised role token.
pub const ROLE_GUEST: &str = "guest";

pub fn is_known_role(token: &str) -> bool {
    ROLE_VOCABULARY.contains(&token)
}

/// Select the single role that drives role-specific behavior.
///
/// Fallback order: explicit choice, then `admin` if held, then the
/// vocabulary in precedence order, then the guest sentinel. Every place
/// that needs a role derives it through this function so the result is
/// identical across call sites.
pub fn derive_active_role(explicit: Option<&str>, permissions: &[String]) -> String {
    if let Some(role) = explicit {
        if !role.is_empty() {
            return role.to_string();
        }
    }

    let held = |token: &str| permissions.iter().any(|p| p == token);

    if held(ROLE_ADMIN) {
        return ROLE_ADMIN.to_string();
    }
    for role in ROLE_VOCABULARY {
        if held(role) {
            return role.to_string();
        }
    }
    ROLE_GUEST.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_explicit_role_wins() {
        let role = derive_active_role(Some("community"), &perms(&["admin", "merchant"]));
        assert_eq!(role, "community");
    }

    #[test]
    fn test_empty_explicit_role_falls_through() {
        let role = derive_active_role(Some(""), &perms(&["merchant"]));
        assert_eq!(role, "merchant");
    }

    #[test]
    fn test_admin_takes_precedence() {
        let role = derive_active_role(None, &perms(&["community", "admin"]));
        assert_eq!(role, "admin");
    }

    #[test]
    fn test_vocabulary_order() {
        let role = derive_active_role(None, &perms(&["community", "merchant"]));
        assert_eq!(role, "merchant");
    }

    #[test]
    fn test_guest_sentinel_for_extension_only() {
        let role = derive_active_role(None, &perms(&["vendor-analytics"]));
        assert_eq!(role, ROLE_GUEST);
    }

    #[test]
    fn test_guest_sentinel_for_empty() {
        assert_eq!(derive_active_role(None, &[]), ROLE_GUEST);
    }
}
