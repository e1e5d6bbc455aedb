// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Leadgate backend.
//!
//! Three surfaces on one axum server:
//! - `/health` (public),
//! - purchase webhooks authenticated by a body secret,
//! - the bearer-token lead API.
//!
//! All delivery work goes through [`leadgate_delivery::Deliverer`]; handlers
//! never talk to channels directly.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod webhook;

pub use auth::AuthSettings;
pub use error::{ApiError, FieldError};
pub use server::{build_router, start_server, BindConfig, GatewayState};
