//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use twilio::{TwilioOptions, TwilioService};

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{ServerDeps, TwilioSmsAdapter};
use crate::server::middleware::credential_resolver_middleware;
use crate::server::routes::{
    grant_permission_handler, health_handler, login_handler, logout_handler, recover_handler,
    recover_verify_handler, revoke_permission_handler, signup_handler, switch_role_handler,
    user_profile_handler, verify_token_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application from loaded configuration.
pub fn build_app(config: &Config) -> Router {
    let twilio = Arc::new(TwilioService::new(TwilioOptions {
        account_sid: config.twilio_account_sid.clone(),
        auth_token: config.twilio_auth_token.clone(),
        from_number: config.twilio_from_number.clone(),
    }));

    let jwt_service = JwtService::new(&config.token_secret, config.token_issuer.clone());
    let deps = ServerDeps::new(
        jwt_service,
        Arc::new(TwilioSmsAdapter::new(twilio)),
        Duration::from_secs(config.sms_timeout_secs),
    );

    build_router(AppState {
        deps: Arc::new(deps),
    })
}

/// Assemble routes and middleware over prepared state.
///
/// Split from `build_app` so tests can drive the router with in-memory
/// stores and a mock SMS sender.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/role", post(switch_role_handler))
        .route("/auth/verify", post(verify_token_handler))
        .route("/auth/permissions/grant", post(grant_permission_handler))
        .route("/auth/permissions/revoke", post(revoke_permission_handler))
        .route("/auth/recover", post(recover_handler))
        .route("/auth/recover/verify", post(recover_verify_handler))
        .route("/users/:user_id", get(user_profile_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            credential_resolver_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
