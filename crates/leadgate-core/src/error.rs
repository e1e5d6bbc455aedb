// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadgate delivery backend.

use thiserror::Error;

/// The primary error type used across Leadgate crates.
#[derive(Debug, Error)]
pub enum LeadgateError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Delivery channel errors (provider rejection, gateway failure, transport).
    ///
    /// These are caught at the channel boundary by the orchestrator and turned
    /// into advisory per-channel outcomes; they never fail an inbound request.
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Product file download failures. Carries the remote HTTP status when
    /// one was received (None for transport-level failures).
    #[error("file download failed: {detail}")]
    Download { status: Option<u16>, detail: String },

    /// A required record was absent (product, lead).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
