// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email delivery channel for the Leadgate backend.
//!
//! Sends product files as base64-encoded attachments through a
//! Resend-compatible transactional email API (`POST {base}/emails`).

pub mod template;

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use leadgate_config::model::EmailConfig;
use leadgate_core::error::LeadgateError;
use leadgate_core::traits::DeliveryChannel;
use leadgate_core::types::{DeliveryKind, DeliveryRequest, HealthStatus};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use tracing::debug;

/// Email channel implementing [`DeliveryChannel`].
#[derive(Debug, Clone)]
pub struct EmailChannel {
    client: reqwest::Client,
    base_url: String,
    sender: String,
}

impl EmailChannel {
    /// Creates the channel from its config section.
    ///
    /// Requires `email.api_key` and `email.sender` to be set.
    pub fn new(config: &EmailConfig) -> Result<Self, LeadgateError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LeadgateError::Config("email.api_key is required for the email channel".into())
            })?;
        let sender = config
            .sender
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                LeadgateError::Config("email.sender is required for the email channel".into())
            })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            LeadgateError::Config(format!("invalid email.api_key header value: {e}"))
        })?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LeadgateError::Channel {
                message: format!("failed to build email HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            sender: sender.to_string(),
        })
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn kind(&self) -> DeliveryKind {
        DeliveryKind::EmailDelivery
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadgateError> {
        // The provider has no cheap unauthenticated probe; a built channel
        // implies complete credentials, so report on configuration only.
        Ok(HealthStatus::Healthy)
    }

    async fn send(&self, req: &DeliveryRequest) -> Result<(), LeadgateError> {
        let body = json!({
            "from": self.sender,
            "to": [req.recipient],
            "subject": req.subject(),
            "html": template::render(&req.customer_name, &req.product_name),
            "attachments": [{
                "filename": req.file_name,
                "content": BASE64.encode(req.payload.as_slice()),
            }],
        });

        let url = format!("{}/emails", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LeadgateError::Channel {
                message: format!("email request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LeadgateError::Channel {
                message: provider_message(status.as_u16(), &text),
                source: None,
            });
        }

        debug!(recipient = %req.recipient, file = %req.file_name, "email dispatched");
        Ok(())
    }
}

/// Extract the provider's error message from a failure body, falling back
/// to a generic status line when the body is not the expected JSON shape.
fn provider_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| format!("email provider returned status {status}"))
}
