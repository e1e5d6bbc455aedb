// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across Leadgate crates.
//!
//! Enum variants serialize to snake_case both in JSON payloads (serde) and
//! in SQLite text columns (strum), so one spelling is used everywhere.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which channels a lead can be reached on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Email,
    Phone,
    Both,
}

/// Whether a lead has completed a purchase. One-way transition:
/// `NotConverted` -> `Converted`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    NotConverted,
    Converted,
}

/// The delivery mechanism used for a single send attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    EmailDelivery,
    WhatsappDelivery,
}

/// Business category of a delivery event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryCategory {
    Sale,
    Remarketing,
    Upsell,
}

/// Health status reported by channel and storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Component is fully operational.
    Healthy,
    /// Component is operational but experiencing issues.
    Degraded(String),
    /// Component is not operational.
    Unhealthy(String),
}

/// A digital asset with a stored location, deliverable to customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Identifier assigned by the external payment gateway, if any.
    pub external_id: Option<String>,
    pub name: String,
    pub product_type: String,
    pub version: String,
    /// Name of the blob store the file lives in (informational).
    pub storage_provider: String,
    /// Absolute URL or bare host/path of the product file.
    pub storage_path: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A captured prospective-or-actual customer contact record.
///
/// Invariant: at least one of `email` / `phone` is present. Enforced at the
/// API boundary and by a CHECK constraint in the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    /// Acquisition source (e.g. `webhook`, `api`, a campaign tag).
    pub source: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_type: ContactType,
    /// Classification tag (e.g. `direct-customer`, `subscriber`).
    pub user_type: String,
    pub marketing_consent: bool,
    pub conversion_status: ConversionStatus,
    pub product_id: Option<String>,
    pub created_at: String,
}

/// A persisted record of one delivery attempt's outcome. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub id: String,
    pub kind: DeliveryKind,
    pub category: DeliveryCategory,
    pub recipient: String,
    /// Subject/description of the outbound message.
    pub description: String,
    pub product_id: Option<String>,
    pub sent_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Everything a delivery channel needs to send one product file.
///
/// The payload is shared between the email and messaging tasks of a single
/// request, so it sits behind an `Arc` rather than being cloned per channel.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    /// Email address or phone number, depending on the channel.
    pub recipient: String,
    pub customer_name: String,
    pub product_name: String,
    pub file_name: String,
    pub payload: Arc<Vec<u8>>,
}

impl DeliveryRequest {
    /// Product-specific subject line, used both for the outbound email and
    /// as the description on the logged delivery event.
    pub fn subject(&self) -> String {
        format!("Your {} is ready", self.product_name)
    }
}

/// Current time as an RFC 3339 UTC timestamp with millisecond precision,
/// the format used for every persisted timestamp column.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn enums_round_trip_through_strings() {
        for ct in [ContactType::Email, ContactType::Phone, ContactType::Both] {
            let s = ct.to_string();
            assert_eq!(ContactType::from_str(&s).unwrap(), ct);
        }
        assert_eq!(DeliveryKind::EmailDelivery.to_string(), "email_delivery");
        assert_eq!(
            DeliveryKind::WhatsappDelivery.to_string(),
            "whatsapp_delivery"
        );
        assert_eq!(
            ConversionStatus::NotConverted.to_string(),
            "not_converted"
        );
    }

    #[test]
    fn contact_type_json_matches_column_spelling() {
        let json = serde_json::to_string(&ContactType::Both).unwrap();
        assert_eq!(json, "\"both\"");
        let parsed: ContactType = serde_json::from_str("\"phone\"").unwrap();
        assert_eq!(parsed, ContactType::Phone);
    }

    #[test]
    fn delivery_request_subject_names_the_product() {
        let req = DeliveryRequest {
            recipient: "ana@example.com".into(),
            customer_name: "Ana".into(),
            product_name: "Pricing Guide".into(),
            file_name: "guide.pdf".into(),
            payload: Arc::new(vec![1, 2, 3]),
        };
        assert_eq!(req.subject(), "Your Pricing Guide is ready");
    }

    #[test]
    fn now_rfc3339_is_utc_with_millis() {
        let ts = now_rfc3339();
        assert!(ts.ends_with('Z'));
        assert!(ts.contains('.'));
    }
}
