//! Ordered credential resolution over the inbound carriers.
//!
//! Three carriers are probed in strict priority order: the session cache,
//! the Authorization header, and the auth cookie. Each probe yields a
//! typed outcome; only the orchestrator here is allowed to touch the
//! session cache, so promotion and invalidation happen in exactly one
//! place.

use tracing::debug;

use crate::domains::auth::{derive_active_role, Claims, JwtService};
use crate::server::auth::session::{CredentialSource, SessionCache, SessionEntry};

/// Credential material extracted from an inbound request
#[derive(Debug, Default, Clone)]
pub struct RequestCredentials {
    /// Token from `Authorization: Bearer <token>`
    pub bearer: Option<String>,
    /// Token from the auth cookie
    pub cookie: Option<String>,
}

/// The caller identity a request resolved to
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub claims: Claims,
    pub raw_token: String,
    pub source: CredentialSource,
}

/// Outcome of probing a single carrier
enum Probe {
    Verified(Claims, String),
    Absent,
    Invalid,
}

fn probe(token: Option<&str>, jwt: &JwtService) -> Probe {
    match token {
        None => Probe::Absent,
        Some(raw) => match jwt.verify(raw) {
            Ok(claims) => Probe::Verified(claims, raw.to_string()),
            Err(_) => Probe::Invalid,
        },
    }
}

/// Resolve the caller's identity from the request carriers.
///
/// `None` means anonymous access - a valid outcome callers must handle
/// explicitly, not an error. A stale cache entry is discarded and the
/// remaining carriers still get their turn; a credential verified from a
/// header or cookie is promoted into the cache so the next request in the
/// session short-circuits at step one.
pub async fn resolve(
    cache: &SessionCache,
    jwt: &JwtService,
    carriers: &RequestCredentials,
) -> Option<ResolvedCredential> {
    // 1. Session cache. The cached token is re-verified: it may have
    //    expired since it was promoted.
    if let Some(entry) = cache.get().await {
        match probe(Some(entry.raw_token.as_str()), jwt) {
            Probe::Verified(claims, raw_token) => {
                return Some(ResolvedCredential {
                    claims,
                    raw_token,
                    source: CredentialSource::Cache,
                });
            }
            _ => {
                debug!("cached credential no longer verifies, discarding");
                cache.clear().await;
            }
        }
    }

    // 2. Authorization header, then 3. cookie. First success wins; an
    //    invalid carrier falls through to the next one.
    for (token, source) in [
        (carriers.bearer.as_deref(), CredentialSource::Header),
        (carriers.cookie.as_deref(), CredentialSource::Cookie),
    ] {
        match probe(token, jwt) {
            Probe::Verified(mut claims, raw_token) => {
                // Pin the active role before promotion so every later read
                // sees the same derivation.
                claims.active_role =
                    derive_active_role(Some(&claims.active_role), &claims.permissions);
                cache
                    .store(SessionEntry {
                        claims: claims.clone(),
                        raw_token: raw_token.clone(),
                        source,
                    })
                    .await;
                return Some(ResolvedCredential {
                    claims,
                    raw_token,
                    source,
                });
            }
            Probe::Absent => {}
            Probe::Invalid => {
                debug!(source = source.as_str(), "carrier credential failed verification");
            }
        }
    }

    None
}
