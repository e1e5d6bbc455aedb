// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery channel trait implemented by the email and messaging adapters.

use async_trait::async_trait;

use crate::error::LeadgateError;
use crate::types::{DeliveryKind, DeliveryRequest, HealthStatus};

/// A mechanism for transmitting a product file to a customer.
///
/// Implementations are a small closed set (email, WhatsApp-style messaging);
/// the orchestrator selects among them by [`DeliveryKind`]. A failed `send`
/// is reported to the caller as an outcome value, never escalated into a
/// request-level failure.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// The delivery kind this channel records events under.
    fn kind(&self) -> DeliveryKind;

    /// Check whether the channel's upstream provider is usable.
    async fn health_check(&self) -> Result<HealthStatus, LeadgateError>;

    /// Send one product file to the request's recipient.
    async fn send(&self, req: &DeliveryRequest) -> Result<(), LeadgateError>;
}
