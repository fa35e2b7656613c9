use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// Pending recovery codes live for 15 minutes.
pub const OTP_TTL_MINUTES: i64 = 15;
/// Number of digits in a generated code.
pub const OTP_CODE_LEN: usize = 6;

/// A pending recovery code for one user
///
/// Only the digest is kept; the raw code exists in memory just long
/// enough to hand to the SMS collaborator.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a numeric recovery code from the thread CSPRNG.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}

/// Digest a code for storage and comparison using SHA256.
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Outcome of a verify-and-consume attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerification {
    /// Code matched; the pending record has been consumed.
    Consumed,
    /// No pending code for the user, or the pending code had expired.
    NotFound,
    /// A pending code exists but the digest did not match.
    Mismatch,
}

/// In-process store of pending recovery codes, keyed by user id
///
/// Verify-and-consume runs under one write guard so a request step and a
/// verify step for the same user cannot interleave inconsistently.
pub struct OtpStore {
    pending: Arc<RwLock<HashMap<String, OtpRecord>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store a pending code for a user, replacing any earlier one.
    pub async fn issue(&self, user_id: &str, code: &str) -> OtpRecord {
        let record = OtpRecord {
            code_hash: hash_code(code),
            expires_at: Utc::now() + Duration::minutes(OTP_TTL_MINUTES),
        };
        self.pending
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        record
    }

    /// Drop a pending code without consuming it (delivery rollback).
    pub async fn discard(&self, user_id: &str) {
        self.pending.write().await.remove(user_id);
    }

    /// Check a code against the pending record and consume it on match.
    ///
    /// Single use: a matching code removes the record, so replaying it
    /// reports `NotFound`. Expired records count as absent and are removed
    /// on the way out.
    pub async fn verify_and_consume(&self, user_id: &str, code: &str) -> OtpVerification {
        let mut pending = self.pending.write().await;
        let Some(record) = pending.get(user_id) else {
            return OtpVerification::NotFound;
        };
        if Utc::now() > record.expires_at {
            pending.remove(user_id);
            return OtpVerification::NotFound;
        }
        if record.code_hash != hash_code(code) {
            return OtpVerification::Mismatch;
        }
        pending.remove(user_id);
        OtpVerification::Consumed
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}
