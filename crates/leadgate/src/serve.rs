// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadgate serve` command implementation.
//!
//! Opens the database, builds the configured delivery channels, and runs the
//! HTTP gateway until the process is stopped. A channel whose config section
//! is incomplete is skipped with a warning rather than failing startup; an
//! eligible lead then gets a per-channel error in the delivery outcome.

use std::sync::Arc;
use std::time::Instant;

use leadgate_config::LeadgateConfig;
use leadgate_core::traits::DeliveryChannel;
use leadgate_core::LeadgateError;
use leadgate_delivery::{Deliverer, FileFetcher};
use leadgate_email::EmailChannel;
use leadgate_gateway::{start_server, AuthSettings, BindConfig, GatewayState};
use leadgate_storage::Database;
use leadgate_whatsapp::WhatsAppChannel;
use tracing::{info, warn};

pub async fn run_serve(config: &LeadgateConfig) -> Result<(), LeadgateError> {
    let db = Database::open(&config.storage.database_path).await?;
    info!(path = %config.storage.database_path, "database ready");

    let channels = build_channels(config)?;
    if channels.is_empty() {
        warn!("no delivery channels configured -- leads will be captured but nothing delivered");
    }

    if config.auth.webhook_secret.is_none() {
        warn!("auth.webhook_secret not set -- all purchase webhooks will be rejected");
    }
    if config.auth.api_token.is_none() {
        warn!("auth.api_token not set -- all lead API requests will be rejected");
    }

    let deliverer = Arc::new(Deliverer::new(db.clone(), FileFetcher::new()?, channels));

    let state = GatewayState {
        db,
        auth: AuthSettings {
            webhook_secret: config.auth.webhook_secret.clone(),
            api_token: config.auth.api_token.clone(),
        },
        deliverer,
        start_time: Instant::now(),
    };

    let bind = BindConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&bind, state).await
}

fn build_channels(
    config: &LeadgateConfig,
) -> Result<Vec<Arc<dyn DeliveryChannel>>, LeadgateError> {
    let mut channels: Vec<Arc<dyn DeliveryChannel>> = Vec::new();

    if config.email.is_configured() {
        channels.push(Arc::new(EmailChannel::new(&config.email)?));
        info!("email channel enabled");
    } else {
        warn!("email channel disabled (email.api_key / email.sender not set)");
    }

    if config.whatsapp.is_configured() {
        channels.push(Arc::new(WhatsAppChannel::new(&config.whatsapp)?));
        info!("whatsapp channel enabled");
    } else {
        warn!("whatsapp channel disabled (whatsapp.api_base_url / whatsapp.token not set)");
    }

    Ok(channels)
}
