//! Shared helpers for integration tests.
//!
//! The router is driven directly through tower's `oneshot`; stores are
//! in-memory and SMS goes through the recording mock.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use server_core::domains::auth::models::otp::OTP_CODE_LEN;
use server_core::domains::auth::models::UserRecord;
use server_core::domains::auth::password::hash_password;
use server_core::domains::auth::JwtService;
use server_core::kernel::{BaseSms, MockSms, ServerDeps};
use server_core::server::{build_router, AppState};

pub const TEST_SECRET: &str = "test_secret_key";
pub const TEST_ISSUER: &str = "test_issuer";

/// Build a router plus a handle on its dependencies.
pub fn test_app(sms: Arc<MockSms>) -> (Router, Arc<ServerDeps>) {
    let jwt_service = JwtService::new(TEST_SECRET, TEST_ISSUER.to_string());
    let sms: Arc<dyn BaseSms> = sms;
    let deps = Arc::new(ServerDeps::new(jwt_service, sms, Duration::from_secs(2)));
    let router = build_router(AppState { deps: deps.clone() });
    (router, deps)
}

/// A JwtService sharing the app's secret, for inspecting issued tokens.
pub fn test_jwt() -> JwtService {
    JwtService::new(TEST_SECRET, TEST_ISSUER.to_string())
}

/// Seed a user straight into the credential store.
pub async fn seed_user(
    deps: &ServerDeps,
    email: &str,
    password: &str,
    permissions: &[&str],
    phone_number: Option<&str>,
) -> UserRecord {
    let record = UserRecord::new(
        email.to_string(),
        hash_password(password).unwrap(),
        permissions.iter().map(|s| s.to_string()).collect(),
        phone_number.map(|s| s.to_string()),
    );
    deps.users.insert(record).await.unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value, Option<String>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json, set_cookie)
}

/// POST a JSON body, optionally with a bearer token.
pub async fn post_json(
    router: &Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value, Option<String>) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(router, request).await
}

/// GET a path, optionally with a bearer token.
pub async fn get_path(
    router: &Router,
    path: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = builder.body(Body::empty()).unwrap();
    let (status, json, _) = send(router, request).await;
    (status, json)
}

/// GET a path presenting the token through the cookie carrier.
pub async fn get_with_cookie(
    router: &Router,
    path: &str,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header("cookie", format!("auth_token={}", token))
        .body(Body::empty())
        .unwrap();
    let (status, json, _) = send(router, request).await;
    (status, json)
}

/// Pull the numeric recovery code out of a delivered SMS body.
pub fn extract_code(body: &str) -> String {
    body.split(|c: char| !c.is_ascii_digit())
        .find(|s| s.len() == OTP_CODE_LEN)
        .expect("message should carry a recovery code")
        .to_string()
}
