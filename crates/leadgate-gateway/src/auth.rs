// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for the gateway.
//!
//! Two independent credentials:
//! - the lead API takes `Authorization: Bearer <token>` via middleware;
//! - purchase webhooks carry a shared secret in the request body, checked by
//!   the handler.
//!
//! Both fail closed: an unconfigured credential rejects every request that
//! depends on it.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

/// Credentials the gateway validates requests against.
#[derive(Clone)]
pub struct AuthSettings {
    /// Shared secret expected in purchase webhook bodies.
    pub webhook_secret: Option<String>,
    /// Bearer token for the lead API.
    pub api_token: Option<String>,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl AuthSettings {
    /// Compare a webhook body secret against the configured one.
    ///
    /// No configured secret means no webhook is ever accepted.
    pub fn check_webhook_secret(&self, provided: Option<&str>) -> Result<(), ApiError> {
        match (&self.webhook_secret, provided) {
            (Some(expected), Some(given)) if expected == given => Ok(()),
            (None, _) => {
                tracing::error!("no webhook secret configured -- rejecting webhook");
                Err(ApiError::Unauthorized)
            }
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Middleware validating `Authorization: Bearer <token>` on the lead API.
pub async fn bearer_auth_middleware(
    State(auth): State<AuthSettings>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(ref expected) = auth.api_token else {
        tracing::error!("no api token configured -- rejecting request");
        return Err(ApiError::Unauthorized);
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => Ok(next.run(request).await),
        _ => Err(ApiError::Unauthorized),
    }
}
