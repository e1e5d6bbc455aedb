// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp-style messaging delivery channel for the Leadgate backend.
//!
//! Posts product files as document messages to a per-instance gateway
//! endpoint (`POST {base}/send-document`), with the file inlined as a
//! base64 data URL.

pub mod phone;

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use leadgate_config::model::WhatsAppConfig;
use leadgate_core::error::LeadgateError;
use leadgate_core::traits::DeliveryChannel;
use leadgate_core::types::{DeliveryKind, DeliveryRequest, HealthStatus};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use tracing::debug;

/// Messaging channel implementing [`DeliveryChannel`].
#[derive(Debug, Clone)]
pub struct WhatsAppChannel {
    client: reqwest::Client,
    base_url: String,
    country_code: String,
}

impl WhatsAppChannel {
    /// Creates the channel from its config section.
    ///
    /// Requires `whatsapp.api_base_url` and `whatsapp.token` to be set.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, LeadgateError> {
        let base_url = config
            .api_base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                LeadgateError::Config(
                    "whatsapp.api_base_url is required for the messaging channel".into(),
                )
            })?;
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                LeadgateError::Config("whatsapp.token is required for the messaging channel".into())
            })?;

        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(token).map_err(|e| {
            LeadgateError::Config(format!("invalid whatsapp.token header value: {e}"))
        })?;
        token_value.set_sensitive(true);
        headers.insert("client-token", token_value);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LeadgateError::Channel {
                message: format!("failed to build messaging HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            country_code: config.country_code.clone(),
        })
    }
}

#[async_trait]
impl DeliveryChannel for WhatsAppChannel {
    fn kind(&self) -> DeliveryKind {
        DeliveryKind::WhatsappDelivery
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadgateError> {
        // A built channel implies complete credentials; the gateway bills
        // per message so there is no free probe worth calling here.
        Ok(HealthStatus::Healthy)
    }

    async fn send(&self, req: &DeliveryRequest) -> Result<(), LeadgateError> {
        let destination = phone::normalize_phone(&req.recipient, &self.country_code);
        let mime = mime_for(&req.file_name);
        let encoded = BASE64.encode(req.payload.as_slice());

        let body = json!({
            "phone": destination,
            "document": format!("data:{mime};base64,{encoded}"),
            "fileName": req.file_name,
            "caption": req.subject(),
        });

        let url = format!("{}/send-document", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LeadgateError::Channel {
                message: format!("messaging request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LeadgateError::Channel {
                message: gateway_message(status.as_u16(), &text),
                source: None,
            });
        }

        debug!(destination = %destination, file = %req.file_name, "document dispatched");
        Ok(())
    }
}

/// Infer the document MIME type from the file extension. Only PDF gets a
/// specific type; everything else goes out as a generic binary.
fn mime_for(file_name: &str) -> &'static str {
    if file_name.to_ascii_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// Extract the gateway's error message from a failure body, falling back to
/// a generic status line.
fn gateway_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| format!("messaging gateway returned status {status}"))
}
