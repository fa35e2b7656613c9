use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Session tokens minted at login are valid for one hour.
pub const LOGIN_TOKEN_TTL_SECS: i64 = 60 * 60;
/// Tokens minted inside the recovery flow are short-lived.
pub const OTP_TOKEN_TTL_SECS: i64 = 15 * 60;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,              // Subject (user_id)
    pub permissions: Vec<String>, // Permission snapshot taken at issuance
    pub active_role: String,      // Role driving role-specific behavior
    pub exp: i64,                 // Expiration timestamp
    pub iat: i64,                 // Issued at timestamp
    pub iss: String,              // Issuer
    pub jti: String,              // Unique token identifier
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Token verification failures.
///
/// `Expired` and `Invalid` are distinct so callers can tell "log in
/// again" apart from a malformed or tampered token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is invalid")]
    Invalid,
}

/// JWT Service - creates and verifies signed session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with the process-wide secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Build a claim set for a user with the given time-to-live.
    pub fn claims_for(
        &self,
        user_id: &str,
        permissions: Vec<String>,
        active_role: String,
        ttl_secs: i64,
    ) -> Claims {
        let now = chrono::Utc::now();
        let exp = now + Duration::seconds(ttl_secs);

        Claims {
            sub: user_id.to_string(),
            permissions,
            active_role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Sign a claim set into a compact token.
    pub fn sign(&self, claims: &Claims) -> anyhow::Result<String> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(Into::into)
    }

    /// Build and sign a token in one step.
    pub fn issue(
        &self,
        user_id: &str,
        permissions: Vec<String>,
        active_role: String,
        ttl_secs: i64,
    ) -> anyhow::Result<String> {
        let claims = self.claims_for(user_id, permissions, active_role, ttl_secs);
        self.sign(&claims)
    }

    /// Verify and decode a token.
    ///
    /// Expiry is compared at second resolution with zero leeway; clock
    /// skew is not compensated.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
