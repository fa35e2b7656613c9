//! Server dependencies for actions and handlers (using traits for testability)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use twilio::TwilioService;

use crate::domains::auth::models::{OtpStore, UserStore};
use crate::domains::auth::JwtService;
use crate::kernel::traits::BaseSms;
use crate::server::auth::SessionCache;

// =============================================================================
// TwilioService Adapter (implements BaseSms trait)
// =============================================================================

/// Wrapper around TwilioService that implements the BaseSms trait
pub struct TwilioSmsAdapter(pub Arc<TwilioService>);

impl TwilioSmsAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSms for TwilioSmsAdapter {
    async fn send(&self, phone_number: &str, body: &str) -> Result<()> {
        self.0
            .send_message(phone_number, body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions and handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub users: Arc<UserStore>,
    pub otps: Arc<OtpStore>,
    pub sessions: Arc<SessionCache>,
    pub jwt_service: Arc<JwtService>,
    pub sms: Arc<dyn BaseSms>,
    /// Upper bound on one SMS dispatch before it counts as failed.
    pub sms_timeout: Duration,
}

impl ServerDeps {
    /// Build a dependency set backed by fresh in-memory stores.
    pub fn new(jwt_service: JwtService, sms: Arc<dyn BaseSms>, sms_timeout: Duration) -> Self {
        Self {
            users: Arc::new(UserStore::new()),
            otps: Arc::new(OtpStore::new()),
            sessions: Arc::new(SessionCache::new()),
            jwt_service: Arc::new(jwt_service),
            sms,
            sms_timeout,
        }
    }
}
