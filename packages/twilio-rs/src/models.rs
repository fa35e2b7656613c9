use serde::{Deserialize, Serialize};

/// Response returned by the Twilio Messages API after queueing a message.
///
/// Only the fields we actually consume are modeled; Twilio returns many more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    pub from: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}
