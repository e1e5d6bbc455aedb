// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery orchestration: decide which channels to invoke for a lead, run
//! them concurrently, aggregate per-channel outcomes, and log events.
//!
//! Channel failures are recoverable-and-reportable: they become entries in
//! the outcome, never errors on the enclosing request. Fan-out is
//! settle-all — a slow or failing channel does not block or cancel its
//! sibling.

use std::sync::Arc;

use leadgate_core::traits::DeliveryChannel;
use leadgate_core::types::{
    ContactType, DeliveryCategory, DeliveryEvent, DeliveryKind, DeliveryRequest, Lead, Product,
    now_rfc3339,
};
use leadgate_core::LeadgateError;
use leadgate_storage::queries::events;
use leadgate_storage::Database;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::fetch::{FetchedFile, FileFetcher};

/// One channel's failure, reported advisory in the response.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelFailure {
    pub channel: DeliveryKind,
    pub error: String,
}

/// Aggregated result of one delivery fan-out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryOutcome {
    /// Set to the lead's contact type iff at least one channel succeeded.
    pub sent_via: Option<ContactType>,
    /// Channels that delivered successfully.
    pub delivered: Vec<DeliveryKind>,
    /// Channels that were attempted and failed.
    pub errors: Vec<ChannelFailure>,
}

impl DeliveryOutcome {
    /// True when at least one channel task was eligible and dispatched.
    pub fn attempted(&self) -> bool {
        !self.delivered.is_empty() || !self.errors.is_empty()
    }
}

/// Composes the file fetcher, the configured channels, and the event log.
pub struct Deliverer {
    db: Database,
    fetcher: FileFetcher,
    channels: Vec<Arc<dyn DeliveryChannel>>,
}

impl Deliverer {
    pub fn new(
        db: Database,
        fetcher: FileFetcher,
        channels: Vec<Arc<dyn DeliveryChannel>>,
    ) -> Self {
        Self {
            db,
            fetcher,
            channels,
        }
    }

    /// The configured channels (doctor/health reporting).
    pub fn channels(&self) -> &[Arc<dyn DeliveryChannel>] {
        &self.channels
    }

    /// Download the product's file into memory.
    pub async fn fetch_file(&self, product: &Product) -> Result<FetchedFile, LeadgateError> {
        self.fetcher.fetch(&product.storage_path).await
    }

    fn channel(&self, kind: DeliveryKind) -> Option<&Arc<dyn DeliveryChannel>> {
        self.channels.iter().find(|c| c.kind() == kind)
    }

    /// Deliver `file` to `lead` on every eligible channel.
    ///
    /// Eligibility double-checks the stored `contact_type` against the
    /// literal presence of the field: a lead tagged `both` whose phone was
    /// later cleared silently drops the messaging task instead of erroring.
    /// All eligible tasks run concurrently and every outcome is awaited —
    /// no short-circuit on first failure, no cancellation of siblings.
    pub async fn deliver(
        &self,
        lead: &Lead,
        product: &Product,
        file: &FetchedFile,
    ) -> DeliveryOutcome {
        let mut plan: Vec<(DeliveryKind, String)> = Vec::new();

        if matches!(lead.contact_type, ContactType::Email | ContactType::Both)
            && let Some(email) = &lead.email
        {
            plan.push((DeliveryKind::EmailDelivery, email.clone()));
        }
        if matches!(lead.contact_type, ContactType::Phone | ContactType::Both)
            && let Some(phone) = &lead.phone
        {
            plan.push((DeliveryKind::WhatsappDelivery, phone.clone()));
        }

        let tasks = plan.into_iter().map(|(kind, recipient)| {
            let req = DeliveryRequest {
                recipient,
                customer_name: lead.name.clone(),
                product_name: product.name.clone(),
                file_name: file.file_name.clone(),
                payload: Arc::clone(&file.payload),
            };
            async move {
                let result = match self.channel(kind) {
                    Some(channel) => channel.send(&req).await,
                    None => Err(LeadgateError::Channel {
                        message: format!("no {kind} channel configured"),
                        source: None,
                    }),
                };
                (kind, req, result)
            }
        });

        let results = futures::future::join_all(tasks).await;

        let mut outcome = DeliveryOutcome::default();
        for (kind, req, result) in results {
            match result {
                Ok(()) => {
                    info!(channel = %kind, recipient = %req.recipient, "delivery succeeded");
                    self.log_event(kind, &req, product).await;
                    outcome.delivered.push(kind);
                }
                Err(e) => {
                    warn!(channel = %kind, recipient = %req.recipient, error = %e, "delivery failed");
                    outcome.errors.push(ChannelFailure {
                        channel: kind,
                        error: e.to_string(),
                    });
                }
            }
        }

        if !outcome.delivered.is_empty() {
            outcome.sent_via = Some(lead.contact_type);
        }
        outcome
    }

    /// Record one delivery event for a successful send. A logging failure
    /// cannot un-send the file, so it is reported and swallowed.
    async fn log_event(&self, kind: DeliveryKind, req: &DeliveryRequest, product: &Product) {
        let now = now_rfc3339();
        let event = DeliveryEvent {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            category: DeliveryCategory::Sale,
            recipient: req.recipient.clone(),
            description: req.subject(),
            product_id: Some(product.id.clone()),
            sent_at: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        };
        if let Err(e) = events::insert_event(&self.db, &event).await {
            error!(error = %e, channel = %kind, "failed to record delivery event");
        }
    }
}
