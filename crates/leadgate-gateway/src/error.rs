// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API error type mapping domain failures to HTTP responses.
//!
//! Internal details never leak to clients: a [`LeadgateError`] that is not a
//! not-found maps to a generic 500 body, with the detail kept in the server
//! log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leadgate_core::LeadgateError;
use serde::Serialize;
use serde_json::json;

/// One field-level validation failure, returned in a 400 body.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors a handler can return. Each variant owns its status code.
#[derive(Debug)]
pub enum ApiError {
    /// Missing/invalid credentials (bearer token or webhook secret).
    Unauthorized,
    /// Request body failed validation; every offending field is listed.
    Validation(Vec<FieldError>),
    /// The referenced entity does not exist.
    NotFound(String),
    /// A lead with the same email or phone already exists.
    Conflict { lead_id: String },
    /// Anything else. Logged server-side, generic body to the client.
    Internal(LeadgateError),
}

impl From<LeadgateError> for ApiError {
    fn from(e: LeadgateError) -> Self {
        match e {
            LeadgateError::NotFound(detail) => ApiError::NotFound(detail),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response(),
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation failed", "fields": fields })),
            )
                .into_response(),
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": detail }))).into_response()
            }
            ApiError::Conflict { lead_id } => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "lead already exists", "leadId": lead_id })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
