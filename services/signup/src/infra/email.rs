use anyhow::Context as _;
use reqwest::Client;
use serde_json::json;

use crate::domain::repository::EmailSender;
use crate::domain::types::EmailMessage;
use crate::error::SignupError;
use crate::infra::http::ensure_success;

/// Email sender backed by the Resend HTTP API.
#[derive(Clone)]
pub struct ResendEmailSender {
    pub http: Client,
    pub base_url: String,
    pub api_key: String,
    pub from: String,
}

impl EmailSender for ResendEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), SignupError> {
        let resp = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": [message.to],
                "subject": message.subject,
                "html": message.html,
            }))
            .send()
            .await
            .context("Send email")?;
        ensure_success(resp, "Send email").await?;
        Ok(())
    }
}
