use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::auth::AuthError;

/// User record - the unit of storage in the credential store
///
/// `password_hash` is write-only towards the outside world: it is never
/// serialized into a response and never logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub permissions: Vec<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a record for a new signup. The user id is generated here and
    /// never changes afterwards.
    pub fn new(
        email: String,
        password_hash: String,
        permissions: Vec<String>,
        phone_number: Option<String>,
    ) -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            permissions,
            phone_number,
            created_at: Utc::now(),
        }
    }

    pub fn has_permission(&self, token: &str) -> bool {
        self.permissions.iter().any(|p| p == token)
    }
}

/// In-process credential store, keyed by user id
///
/// Reads run concurrently; every mutation goes through the single writer
/// lock, which serializes read-modify-write of a record. Emails are unique
/// case-insensitively across all records.
pub struct UserStore {
    records: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get a record by user id
    pub async fn get(&self, user_id: &str) -> Option<UserRecord> {
        self.records.read().await.get(user_id).cloned()
    }

    /// Find a record by email, case-insensitively
    ///
    /// A linear scan: record counts stay small enough that a secondary
    /// index would buy nothing.
    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.records
            .read()
            .await
            .values()
            .find(|r| r.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Insert a new record, enforcing the unique-email invariant
    pub async fn insert(&self, record: UserRecord) -> Result<UserRecord, AuthError> {
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|r| r.email.eq_ignore_ascii_case(&record.email))
        {
            return Err(AuthError::Conflict);
        }
        records.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    /// Replace a record wholesale (per-key atomicity only)
    pub async fn put(&self, record: UserRecord) {
        self.records
            .write()
            .await
            .insert(record.user_id.clone(), record);
    }

    /// Rotate the stored password hash for a user
    pub async fn update_password(
        &self,
        user_id: &str,
        password_hash: String,
    ) -> Result<(), AuthError> {
        let mut records = self.records.write().await;
        match records.get_mut(user_id) {
            Some(record) => {
                record.password_hash = password_hash;
                Ok(())
            }
            None => Err(AuthError::NotFound),
        }
    }

    /// Grant a permission token to a user
    ///
    /// Idempotent; takes effect on the next token issuance, not on tokens
    /// already in flight.
    pub async fn grant_permission(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<UserRecord, AuthError> {
        let mut records = self.records.write().await;
        match records.get_mut(user_id) {
            Some(record) => {
                if !record.permissions.iter().any(|p| p == token) {
                    record.permissions.push(token.to_string());
                }
                Ok(record.clone())
            }
            None => Err(AuthError::NotFound),
        }
    }

    /// Revoke a permission token from a user
    pub async fn revoke_permission(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<UserRecord, AuthError> {
        let mut records = self.records.write().await;
        match records.get_mut(user_id) {
            Some(record) => {
                record.permissions.retain(|p| p != token);
                Ok(record.clone())
            }
            None => Err(AuthError::NotFound),
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> UserRecord {
        UserRecord::new(
            email.to_string(),
            "hash".to_string(),
            vec!["community".to_string()],
            None,
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = UserStore::new();
        let inserted = store.insert(record("a@b.com")).await.unwrap();

        let fetched = store.get(&inserted.user_id).await.unwrap();
        assert_eq!(fetched.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_case_insensitively() {
        let store = UserStore::new();
        store.insert(record("a@b.com")).await.unwrap();

        let result = store.insert(record("A@B.COM")).await;
        assert!(matches!(result, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn test_find_by_email_case_insensitive() {
        let store = UserStore::new();
        let inserted = store.insert(record("Seller@Market.com")).await.unwrap();

        let found = store.find_by_email("seller@market.com").await.unwrap();
        assert_eq!(found.user_id, inserted.user_id);
        assert!(store.find_by_email("other@market.com").await.is_none());
    }

    #[tokio::test]
    async fn test_grant_and_revoke_permission() {
        let store = UserStore::new();
        let user = store.insert(record("a@b.com")).await.unwrap();

        let updated = store
            .grant_permission(&user.user_id, "merchant")
            .await
            .unwrap();
        assert!(updated.has_permission("merchant"));

        // Granting twice does not duplicate the token
        let updated = store
            .grant_permission(&user.user_id, "merchant")
            .await
            .unwrap();
        assert_eq!(
            updated
                .permissions
                .iter()
                .filter(|p| p.as_str() == "merchant")
                .count(),
            1
        );

        let updated = store
            .revoke_permission(&user.user_id, "merchant")
            .await
            .unwrap();
        assert!(!updated.has_permission("merchant"));
    }

    #[tokio::test]
    async fn test_put_replaces_record() {
        let store = UserStore::new();
        let mut user = store.insert(record("a@b.com")).await.unwrap();

        user.phone_number = Some("+15555551234".to_string());
        store.put(user.clone()).await;

        let fetched = store.get(&user.user_id).await.unwrap();
        assert_eq!(fetched.phone_number.as_deref(), Some("+15555551234"));
    }

    #[tokio::test]
    async fn test_update_password_unknown_user() {
        let store = UserStore::new();
        let result = store.update_password("missing", "hash".to_string()).await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_password_hash_not_serialized() {
        let user = record("a@b.com");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hash"));
    }
}
