// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.

use anyhow::Result;
use async_trait::async_trait;

/// Outbound SMS delivery.
///
/// Implementations must not log message bodies: recovery codes travel
/// through here.
#[async_trait]
pub trait BaseSms: Send + Sync {
    async fn send(&self, phone_number: &str, body: &str) -> Result<()>;
}
