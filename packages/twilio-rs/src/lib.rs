// https://www.twilio.com/docs/messaging/api/message-resource

use std::collections::HashMap;
use std::time::Duration;

pub mod models;
use reqwest::{header, Client};

use crate::models::MessageResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self { options }
    }

    /// Send an SMS to a phone number via the Twilio Messages API.
    ///
    /// The message body is never printed here: callers use this for
    /// one-time codes, so only status and Twilio error metadata may be
    /// logged.
    pub async fn send_message(
        self: &TwilioService,
        to: &str,
        body: &str,
    ) -> Result<MessageResponse, &'static str> {
        let account_sid = self.options.account_sid.clone();
        let auth_token = self.options.auth_token.clone();
        let from_number = self.options.from_number.clone();

        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{acc_sid}/Messages.json",
            acc_sid = account_sid
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "Content-Type",
            "application/x-www-form-urlencoded"
                .parse()
                .expect("Header value should parse correctly"),
        );

        let mut form_body: HashMap<&str, String> = HashMap::new();
        form_body.insert("To", to.to_string());
        form_body.insert("From", from_number);
        form_body.insert("Body", body.to_string());

        let client = Client::new();
        let res = client
            .post(url)
            .basic_auth(account_sid, Some(auth_token))
            .headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .form(&form_body)
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Twilio's error JSON carries no message body content
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("Twilio error ({}): {}", status, error_body);
                    return Err("Twilio returned an error");
                }

                let result = response.json::<MessageResponse>().await;
                match result {
                    Ok(data) => {
                        if data.status == "failed" || data.status == "undelivered" {
                            eprintln!(
                                "Twilio rejected message {}: code {:?}",
                                data.sid, data.error_code
                            );
                            return Err("Twilio rejected the message");
                        }
                        Ok(data)
                    }
                    Err(e) => {
                        eprintln!("Failed to parse Twilio response: {}", e);
                        Err("Error parsing message response")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to Twilio failed: {}", e);
                Err("Error sending message")
            }
        }
    }
}
