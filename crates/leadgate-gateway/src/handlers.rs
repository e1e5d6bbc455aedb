// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead API and health handlers.
//!
//! The lead API sits behind bearer auth (see [`crate::auth`]); health is
//! public for process supervisors.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use leadgate_core::contact::ContactInfo;
use leadgate_core::types::{now_rfc3339, ConversionStatus, Lead};
use leadgate_delivery::ChannelFailure;
use leadgate_storage::queries::{leads, products};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, FieldError};
use crate::server::GatewayState;

/// Request body for POST /v1/leads and POST /v1/leads/deliver.
#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub marketing_consent: Option<bool>,
    #[serde(default)]
    pub product_id: Option<String>,
}

/// Request body for PATCH /v1/leads.
#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Lead API response. Delivery keys follow the webhook convention: present
/// only when a delivery was attempted and meaningful.
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub ok: bool,
    pub lead: Lead,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_errors: Option<Vec<ChannelFailure>>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /v1/leads
///
/// Capture a lead without delivering anything. Duplicate contact (email or
/// phone already on file) is a 409 carrying the existing lead's id.
pub async fn create_lead(
    State(state): State<GatewayState>,
    Json(body): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), ApiError> {
    let contact = require_contact(&body.email, &body.phone)?;
    reject_duplicate(&state, &contact).await?;

    if let Some(ref product_id) = body.product_id
        && products::get_product(&state.db, product_id).await?.is_none()
    {
        return Err(ApiError::NotFound("product not found".into()));
    }

    let lead = new_lead(&body, contact, ConversionStatus::NotConverted);
    leads::insert_lead(&state.db, &lead).await?;
    info!(lead_id = %lead.id, source = %lead.source, "lead captured");

    Ok((
        StatusCode::CREATED,
        Json(LeadResponse {
            ok: true,
            lead,
            delivery_sent: None,
            delivery_errors: None,
        }),
    ))
}

/// POST /v1/leads/deliver
///
/// Capture a lead as converted and deliver the product file immediately.
/// `product_id` is mandatory here; the file is fetched before the lead row
/// is written.
pub async fn create_lead_with_delivery(
    State(state): State<GatewayState>,
    Json(body): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), ApiError> {
    let contact = require_contact(&body.email, &body.phone)?;

    let Some(ref product_id) = body.product_id else {
        return Err(ApiError::Validation(vec![FieldError::new(
            "product_id",
            "required",
        )]));
    };

    reject_duplicate(&state, &contact).await?;

    let product = products::get_product(&state.db, product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".into()))?;

    let file = state.deliverer.fetch_file(&product).await?;

    let lead = new_lead(&body, contact, ConversionStatus::Converted);
    leads::insert_lead(&state.db, &lead).await?;

    let outcome = state.deliverer.deliver(&lead, &product, &file).await;
    info!(
        lead_id = %lead.id,
        product_id = %product.id,
        delivered = outcome.delivered.len(),
        failed = outcome.errors.len(),
        "lead captured with delivery"
    );

    Ok((
        StatusCode::CREATED,
        Json(LeadResponse {
            ok: true,
            lead,
            delivery_sent: (!outcome.delivered.is_empty()).then_some(true),
            delivery_errors: (!outcome.errors.is_empty()).then_some(outcome.errors),
        }),
    ))
}

/// PATCH /v1/leads
///
/// Reclassify an existing lead's `user_type`, looked up by email or phone.
pub async fn update_lead(
    State(state): State<GatewayState>,
    Json(body): Json<UpdateLeadRequest>,
) -> Result<Json<LeadResponse>, ApiError> {
    let Some(user_type) = body.user_type.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::Validation(vec![FieldError::new(
            "user_type",
            "required",
        )]));
    };
    let contact = require_contact(&body.email, &body.phone)?;

    let existing =
        leads::find_by_email_or_phone(&state.db, contact.email.as_deref(), contact.phone.as_deref())
            .await?
            .ok_or_else(|| ApiError::NotFound("lead not found".into()))?;

    leads::update_user_type(&state.db, &existing.id, &user_type).await?;
    let lead = leads::get_lead(&state.db, &existing.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("lead not found".into()))?;
    info!(lead_id = %lead.id, user_type = %lead.user_type, "lead reclassified");

    Ok(Json(LeadResponse {
        ok: true,
        lead,
        delivery_sent: None,
        delivery_errors: None,
    }))
}

fn require_contact(
    email: &Option<String>,
    phone: &Option<String>,
) -> Result<ContactInfo, ApiError> {
    let contact = ContactInfo::normalize(email.as_deref(), phone.as_deref());
    if contact.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "email",
            "at least one of email or phone is required",
        )]));
    }
    Ok(contact)
}

async fn reject_duplicate(state: &GatewayState, contact: &ContactInfo) -> Result<(), ApiError> {
    if let Some(existing) = leads::find_by_email_or_phone(
        &state.db,
        contact.email.as_deref(),
        contact.phone.as_deref(),
    )
    .await?
    {
        return Err(ApiError::Conflict {
            lead_id: existing.id,
        });
    }
    Ok(())
}

fn new_lead(body: &CreateLeadRequest, contact: ContactInfo, status: ConversionStatus) -> Lead {
    let contact_type = contact.contact_type();
    Lead {
        id: uuid::Uuid::new_v4().to_string(),
        source: body.source.clone().unwrap_or_else(|| "api".to_string()),
        name: body.name.clone().unwrap_or_default(),
        email: contact.email,
        phone: contact.phone,
        contact_type,
        user_type: body
            .user_type
            .clone()
            .unwrap_or_else(|| "subscriber".to_string()),
        marketing_consent: body.marketing_consent.unwrap_or(false),
        conversion_status: status,
        product_id: body.product_id.clone(),
        created_at: now_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgate_core::types::ContactType;

    fn request(json: &str) -> CreateLeadRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req = request(r#"{"email": "ana@x.com"}"#);
        assert_eq!(req.email.as_deref(), Some("ana@x.com"));
        assert!(req.product_id.is_none());
    }

    #[test]
    fn new_lead_applies_defaults() {
        let req = request(r#"{"email": "ana@x.com"}"#);
        let contact = require_contact(&req.email, &req.phone).unwrap();
        let lead = new_lead(&req, contact, ConversionStatus::NotConverted);
        assert_eq!(lead.source, "api");
        assert_eq!(lead.user_type, "subscriber");
        assert!(!lead.marketing_consent);
        assert_eq!(lead.contact_type, ContactType::Email);
        assert_eq!(lead.conversion_status, ConversionStatus::NotConverted);
    }

    #[test]
    fn contact_is_required() {
        let req = request(r#"{"name": "Ana"}"#);
        let err = require_contact(&req.email, &req.phone).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn whitespace_contact_counts_as_absent() {
        let err = require_contact(&Some("   ".into()), &None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn lead_response_omits_delivery_keys_when_none() {
        let req = request(r#"{"email": "ana@x.com"}"#);
        let contact = require_contact(&req.email, &req.phone).unwrap();
        let lead = new_lead(&req, contact, ConversionStatus::NotConverted);
        let json = serde_json::to_value(LeadResponse {
            ok: true,
            lead,
            delivery_sent: None,
            delivery_errors: None,
        })
        .unwrap();
        assert!(json.get("delivery_sent").is_none());
        assert!(json.get("delivery_errors").is_none());
    }
}
