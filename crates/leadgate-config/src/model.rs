// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Leadgate backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Leadgate configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to values
/// that keep the corresponding feature disabled (fail closed for auth,
/// channel absent for delivery).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeadgateConfig {
    /// HTTP server bind settings and log level.
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared secrets guarding the webhook and lead API surfaces.
    #[serde(default)]
    pub auth: AuthConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Transactional email provider settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// WhatsApp-style messaging gateway settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Inbound authentication secrets.
///
/// Both are optional; an absent secret makes the corresponding guard reject
/// every request rather than crash or allow anonymous access.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Shared secret expected in purchase webhook bodies.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Bearer token expected on lead API requests.
    #[serde(default)]
    pub api_token: Option<String>,
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "leadgate.db".to_string()
}

/// Transactional email provider configuration.
///
/// The email channel is enabled iff `api_key` and `sender` are both set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// Provider API key. `None` disables the email channel.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender identity, e.g. `Leadgate <noreply@example.com>`.
    #[serde(default)]
    pub sender: Option<String>,

    /// Provider API base URL.
    #[serde(default = "default_email_base_url")]
    pub api_base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            sender: None,
            api_base_url: default_email_base_url(),
        }
    }
}

fn default_email_base_url() -> String {
    "https://api.resend.com".to_string()
}

/// Messaging gateway configuration.
///
/// The WhatsApp channel is enabled iff `api_base_url` and `token` are set.
/// Gateways assign a per-instance base URL, so there is no usable default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Per-instance gateway base URL.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Gateway client token.
    #[serde(default)]
    pub token: Option<String>,

    /// Country code prefixed to phone numbers that lack it.
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            token: None,
            country_code: default_country_code(),
        }
    }
}

fn default_country_code() -> String {
    "55".to_string()
}

impl EmailConfig {
    /// True when the section is complete enough to build the channel.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.sender.is_some()
    }
}

impl WhatsAppConfig {
    /// True when the section is complete enough to build the channel.
    pub fn is_configured(&self) -> bool {
        self.api_base_url.is_some() && self.token.is_some()
    }
}
