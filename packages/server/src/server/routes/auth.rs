//! Auth endpoints: signup, login, logout, role switch, token
//! introspection, permission administration, and password recovery.

use axum::extract::{Extension, State};
use axum::http::{header::SET_COOKIE, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::AuthError;
use crate::domains::auth::actions::{
    grant_permission, login, request_reset, revoke_permission, signup, switch_role, verify_reset,
    LoginOutcome,
};
use crate::server::app::AppState;
use crate::server::middleware::{AuthUser, AUTH_COOKIE};

/// Cookie lifetime for issued tokens (7 days)
const COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SwitchRoleRequest {
    pub role: String,
}

#[derive(Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct PermissionRequest {
    pub user_id: String,
    pub permission: String,
}

#[derive(Deserialize)]
pub struct RecoverRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct RecoverVerifyRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: String,
    pub active_role: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: String,
}

fn auth_cookie(token: &str) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; Secure",
        AUTH_COOKIE, token, COOKIE_MAX_AGE_SECS
    )
}

fn expired_cookie() -> String {
    format!("{}=; Max-Age=0; Path=/; Secure", AUTH_COOKIE)
}

/// 200 with the issued token as JSON plus the auth cookie
fn token_response(outcome: LoginOutcome) -> Response {
    let cookie = auth_cookie(&outcome.token);
    (
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(TokenResponse {
            token: outcome.token,
            user_id: outcome.user_id,
            active_role: outcome.active_role,
        }),
    )
        .into_response()
}

fn require_auth(auth: Option<Extension<AuthUser>>) -> Result<AuthUser, AuthError> {
    auth.map(|Extension(user)| user)
        .ok_or(AuthError::AuthenticationRequired)
}

pub async fn signup_handler(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Response, AuthError> {
    let record = signup(&req.email, &req.password, req.phone_number, &state.deps).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: record.user_id,
        }),
    )
        .into_response())
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let outcome = login(&req.email, &req.password, &state.deps).await?;
    Ok(token_response(outcome))
}

pub async fn logout_handler(State(state): State<AppState>) -> Response {
    state.deps.sessions.clear().await;
    (
        StatusCode::OK,
        [(SET_COOKIE, expired_cookie())],
        Json(serde_json::json!({ "status": "logged_out" })),
    )
        .into_response()
}

pub async fn switch_role_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(req): Json<SwitchRoleRequest>,
) -> Result<Response, AuthError> {
    let user = require_auth(auth)?;
    let outcome = switch_role(&user.claims, &req.role, &state.deps).await?;
    Ok(token_response(outcome))
}

/// Introspect a token without touching the session cache.
///
/// Reports the precise failure kind so clients can distinguish "log in
/// again" from a bad token.
pub async fn verify_token_handler(
    State(state): State<AppState>,
    Json(req): Json<VerifyTokenRequest>,
) -> Result<Response, AuthError> {
    let claims = state.deps.jwt_service.verify(&req.token)?;
    Ok((StatusCode::OK, Json(claims)).into_response())
}

pub async fn grant_permission_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(req): Json<PermissionRequest>,
) -> Result<Response, AuthError> {
    let user = require_auth(auth)?;
    let record = grant_permission(&user.claims, &req.user_id, &req.permission, &state.deps).await?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

pub async fn revoke_permission_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(req): Json<PermissionRequest>,
) -> Result<Response, AuthError> {
    let user = require_auth(auth)?;
    let record =
        revoke_permission(&user.claims, &req.user_id, &req.permission, &state.deps).await?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

pub async fn recover_handler(
    State(state): State<AppState>,
    Json(req): Json<RecoverRequest>,
) -> Result<Response, AuthError> {
    request_reset(&req.email, &state.deps).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "status": "code_sent" })),
    )
        .into_response())
}

pub async fn recover_verify_handler(
    State(state): State<AppState>,
    Json(req): Json<RecoverVerifyRequest>,
) -> Result<Response, AuthError> {
    let outcome = verify_reset(&req.email, &req.code, &req.new_password, &state.deps).await?;
    Ok(token_response(outcome))
}
