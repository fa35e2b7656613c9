use tokio::sync::RwLock;

use crate::domains::auth::Claims;

/// Channel a credential was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Cache,
    Header,
    Cookie,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Cache => "cache",
            CredentialSource::Header => "header",
            CredentialSource::Cookie => "cookie",
        }
    }
}

/// A verified credential mirrored into the session cache
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub claims: Claims,
    pub raw_token: String,
    pub source: CredentialSource,
}

/// Cache of the last verified credential for the current logical session
///
/// Exists so a credential verified once is not re-verified from its
/// carrier on every request in the same session. Cleared on logout and
/// whenever the cached token stops verifying. Session-scoped, never
/// durable: permission changes land on the next token issuance, not here.
pub struct SessionCache {
    entry: RwLock<Option<SessionEntry>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Option<SessionEntry> {
        self.entry.read().await.clone()
    }

    /// Replace the cached credential
    pub async fn store(&self, entry: SessionEntry) {
        *self.entry.write().await = Some(entry);
    }

    /// Drop the cached credential (logout, failed verification)
    pub async fn clear(&self) {
        *self.entry.write().await = None;
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}
