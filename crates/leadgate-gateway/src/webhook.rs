// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Purchase webhook handlers.
//!
//! The payment gateway posts a purchase payload carrying a shared secret, an
//! event name, and the customer + product data. Only `purchase_approved`
//! events are processed; everything else is acknowledged and ignored so the
//! sender does not retry.
//!
//! Ordering matters on the happy path: the product file is fetched *before*
//! the lead row is written, so a dead storage path fails the request without
//! leaving a converted lead behind.

use axum::extract::State;
use axum::Json;
use leadgate_core::contact::ContactInfo;
use leadgate_core::types::{ContactType, Lead, Product};
use leadgate_delivery::{ChannelFailure, DeliveryOutcome};
use leadgate_storage::queries::{leads, products};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, FieldError};
use crate::server::GatewayState;

/// The only purchase event that triggers lead capture and delivery.
pub const PURCHASE_APPROVED: &str = "purchase_approved";

/// Webhook request body. Every field is optional at the serde level so that
/// missing pieces surface as structured validation errors, not decode
/// failures.
#[derive(Debug, Deserialize)]
pub struct PurchasePayload {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub data: Option<PurchaseData>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseData {
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub product: Option<ProductRef>,
}

#[derive(Debug, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductRef {
    #[serde(default)]
    pub id: Option<String>,
}

/// Webhook response body. Delivery keys are present only when meaningful:
/// `delivery_sent` appears iff at least one channel succeeded and
/// `delivery_errors` iff at least one failed.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
    #[serde(rename = "leadId", skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(rename = "productId", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(rename = "sentVia", skip_serializing_if = "Option::is_none")]
    pub sent_via: Option<ContactType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_errors: Option<Vec<ChannelFailure>>,
}

impl WebhookResponse {
    fn ignored() -> Self {
        Self {
            ok: true,
            ignored: Some(true),
            lead_id: None,
            product_id: None,
            sent_via: None,
            delivery_sent: None,
            delivery_errors: None,
        }
    }

    fn delivered(lead: &Lead, product: &Product, outcome: DeliveryOutcome) -> Self {
        Self {
            ok: true,
            ignored: None,
            lead_id: Some(lead.id.clone()),
            product_id: Some(product.id.clone()),
            sent_via: Some(lead.contact_type),
            delivery_sent: (!outcome.delivered.is_empty()).then_some(true),
            delivery_errors: (!outcome.errors.is_empty()).then_some(outcome.errors),
        }
    }
}

/// Which identifier the webhook route resolves the product by.
enum ProductKey {
    External,
    Internal,
}

/// POST /v1/webhooks/purchase
///
/// Resolves the product by the payment gateway's external product id.
pub async fn purchase(
    State(state): State<GatewayState>,
    Json(body): Json<PurchasePayload>,
) -> Result<Json<WebhookResponse>, ApiError> {
    handle_purchase(state, body, ProductKey::External).await
}

/// POST /v1/webhooks/purchase/by-product-id
///
/// Same flow, but `data.product.id` is the internal product id.
pub async fn purchase_by_product_id(
    State(state): State<GatewayState>,
    Json(body): Json<PurchasePayload>,
) -> Result<Json<WebhookResponse>, ApiError> {
    handle_purchase(state, body, ProductKey::Internal).await
}

async fn handle_purchase(
    state: GatewayState,
    body: PurchasePayload,
    key: ProductKey,
) -> Result<Json<WebhookResponse>, ApiError> {
    state.auth.check_webhook_secret(body.secret.as_deref())?;

    if body.event.as_deref() != Some(PURCHASE_APPROVED) {
        info!(event = body.event.as_deref().unwrap_or("<none>"), "ignoring non-purchase event");
        return Ok(Json(WebhookResponse::ignored()));
    }

    let (customer, product_id) = validate_payload(body.data)?;

    let contact = ContactInfo::normalize(customer.email.as_deref(), customer.phone.as_deref());
    if contact.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "data.customer",
            "at least one of email or phone is required",
        )]));
    }

    let product = match key {
        ProductKey::External => products::get_product_by_external_id(&state.db, &product_id).await,
        ProductKey::Internal => products::get_product(&state.db, &product_id).await,
    }?
    .ok_or_else(|| ApiError::NotFound("product not found".into()))?;

    // Fetch before any lead write.
    let file = state.deliverer.fetch_file(&product).await?;

    let lead = leads::upsert_converted_lead(
        &state.db,
        leads::LeadUpsert {
            source: "webhook".into(),
            name: customer.name.unwrap_or_default(),
            contact,
            user_type: "direct-customer".into(),
            marketing_consent: false,
            product_id: Some(product.id.clone()),
        },
    )
    .await?;

    let outcome = state.deliverer.deliver(&lead, &product, &file).await;
    info!(
        lead_id = %lead.id,
        product_id = %product.id,
        delivered = outcome.delivered.len(),
        failed = outcome.errors.len(),
        "purchase webhook processed"
    );

    Ok(Json(WebhookResponse::delivered(&lead, &product, outcome)))
}

/// Pull the customer and product id out of the payload, collecting every
/// missing field into one validation error.
fn validate_payload(data: Option<PurchaseData>) -> Result<(Customer, String), ApiError> {
    let Some(data) = data else {
        return Err(ApiError::Validation(vec![FieldError::new(
            "data",
            "required",
        )]));
    };

    let mut fields = Vec::new();
    if data.customer.is_none() {
        fields.push(FieldError::new("data.customer", "required"));
    }
    let product_id = data.product.and_then(|p| p.id);
    if product_id.is_none() {
        fields.push(FieldError::new("data.product.id", "required"));
    }

    match (data.customer, product_id) {
        (Some(customer), Some(product_id)) => Ok((customer, product_id)),
        _ => Err(ApiError::Validation(fields)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_tolerates_missing_fields() {
        let body: PurchasePayload = serde_json::from_str(r#"{"secret": "x"}"#).unwrap();
        assert_eq!(body.secret.as_deref(), Some("x"));
        assert!(body.event.is_none());
        assert!(body.data.is_none());
    }

    #[test]
    fn validate_collects_all_missing_fields() {
        let err = validate_payload(Some(PurchaseData {
            customer: None,
            product: None,
        }))
        .unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "data.customer");
                assert_eq!(fields[1].field, "data.product.id");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_accepts_complete_payload() {
        let (customer, product_id) = validate_payload(Some(PurchaseData {
            customer: Some(Customer {
                name: Some("Ana".into()),
                email: Some("ana@x.com".into()),
                phone: None,
            }),
            product: Some(ProductRef {
                id: Some("hx-900".into()),
            }),
        }))
        .unwrap();
        assert_eq!(customer.email.as_deref(), Some("ana@x.com"));
        assert_eq!(product_id, "hx-900");
    }

    #[test]
    fn ignored_response_has_no_delivery_keys() {
        let json = serde_json::to_value(WebhookResponse::ignored()).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["ignored"], true);
        assert!(json.get("delivery_sent").is_none());
        assert!(json.get("delivery_errors").is_none());
        assert!(json.get("leadId").is_none());
    }

    #[test]
    fn delivery_keys_reflect_outcome() {
        let lead = Lead {
            id: "l-1".into(),
            source: "webhook".into(),
            name: "Ana".into(),
            email: Some("ana@x.com".into()),
            phone: None,
            contact_type: ContactType::Email,
            user_type: "direct-customer".into(),
            marketing_consent: false,
            conversion_status: leadgate_core::types::ConversionStatus::Converted,
            product_id: Some("p-1".into()),
            created_at: leadgate_core::types::now_rfc3339(),
        };
        let now = leadgate_core::types::now_rfc3339();
        let product = Product {
            id: "p-1".into(),
            external_id: Some("hx-1".into()),
            name: "Guide".into(),
            product_type: "ebook".into(),
            version: "1.0".into(),
            storage_provider: "cdn".into(),
            storage_path: "cdn.example.com/g.pdf".into(),
            created_at: now.clone(),
            updated_at: now,
        };

        let outcome = DeliveryOutcome {
            sent_via: Some(ContactType::Email),
            delivered: vec![leadgate_core::types::DeliveryKind::EmailDelivery],
            errors: vec![],
        };
        let json =
            serde_json::to_value(WebhookResponse::delivered(&lead, &product, outcome)).unwrap();
        assert_eq!(json["delivery_sent"], true);
        assert!(json.get("delivery_errors").is_none());
        assert_eq!(json["sentVia"], "email");
        assert_eq!(json["leadId"], "l-1");

        let outcome = DeliveryOutcome {
            sent_via: None,
            delivered: vec![],
            errors: vec![ChannelFailure {
                channel: leadgate_core::types::DeliveryKind::EmailDelivery,
                error: "provider down".into(),
            }],
        };
        let json =
            serde_json::to_value(WebhookResponse::delivered(&lead, &product, outcome)).unwrap();
        assert!(json.get("delivery_sent").is_none());
        assert_eq!(json["delivery_errors"][0]["channel"], "email_delivery");
    }
}
