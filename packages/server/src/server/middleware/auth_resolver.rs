use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domains::auth::Claims;
use crate::server::app::AppState;
use crate::server::auth::resolver::{resolve, RequestCredentials};
use crate::server::auth::CredentialSource;

/// Name of the cookie carrying the auth token
pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated caller produced by credential resolution
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub claims: Claims,
    pub raw_token: String,
    pub source: CredentialSource,
}

/// Credential resolution middleware
///
/// Probes the session cache, the Authorization header, and the auth
/// cookie in that order and stores an AuthUser in request extensions on
/// success.
///
/// Note: this middleware does NOT block requests - anonymous access is a
/// valid outcome handlers must deal with explicitly.
pub async fn credential_resolver_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let carriers = extract_carriers(&request);
    let deps = &state.deps;

    if let Some(resolved) = resolve(&deps.sessions, &deps.jwt_service, &carriers).await {
        debug!(
            user_id = %resolved.claims.sub,
            source = resolved.source.as_str(),
            "request authenticated"
        );
        request.extensions_mut().insert(AuthUser {
            user_id: resolved.claims.user_id().to_string(),
            claims: resolved.claims,
            raw_token: resolved.raw_token,
            source: resolved.source,
        });
    } else {
        debug!("no valid credential on request");
    }

    next.run(request).await
}

/// Pull the raw credential carriers off a request
fn extract_carriers(request: &Request) -> RequestCredentials {
    let bearer = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        // Handle both "Bearer <token>" and a raw token
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).to_string());

    let cookie = request
        .headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(find_auth_cookie);

    RequestCredentials { bearer, cookie }
}

fn find_auth_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == AUTH_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder();
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_header() {
        let request = request_with_headers(&[("authorization", "Bearer tok123")]);
        let carriers = extract_carriers(&request);
        assert_eq!(carriers.bearer.as_deref(), Some("tok123"));
        assert!(carriers.cookie.is_none());
    }

    #[test]
    fn test_extract_raw_authorization_header() {
        let request = request_with_headers(&[("authorization", "tok123")]);
        let carriers = extract_carriers(&request);
        assert_eq!(carriers.bearer.as_deref(), Some("tok123"));
    }

    #[test]
    fn test_extract_auth_cookie_among_others() {
        let request = request_with_headers(&[(
            "cookie",
            "theme=dark; auth_token=tok456; locale=en-US",
        )]);
        let carriers = extract_carriers(&request);
        assert_eq!(carriers.cookie.as_deref(), Some("tok456"));
    }

    #[test]
    fn test_no_carriers() {
        let request = request_with_headers(&[("cookie", "theme=dark")]);
        let carriers = extract_carriers(&request);
        assert!(carriers.bearer.is_none());
        assert!(carriers.cookie.is_none());
    }
}
