//! Test doubles for infrastructure traits
//!
//! Used by unit and integration tests; never wired up in production code.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::kernel::traits::BaseSms;

/// Recording SMS double with a switchable failure mode.
pub struct MockSms {
    fail: AtomicBool,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl MockSms {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(true),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Toggle delivery failure for subsequent sends.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// The body of the most recent message, if any was delivered.
    pub async fn last_body(&self) -> Option<String> {
        self.sent.lock().await.last().map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl BaseSms for MockSms {
    async fn send(&self, phone_number: &str, body: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("simulated delivery failure");
        }
        self.sent
            .lock()
            .await
            .push((phone_number.to_string(), body.to_string()));
        Ok(())
    }
}
