// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./leadgate.toml` > `~/.config/leadgate/leadgate.toml`
//! > `/etc/leadgate/leadgate.toml` with environment variable overrides via the
//! `LEADGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LeadgateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/leadgate/leadgate.toml` (system-wide)
/// 3. `~/.config/leadgate/leadgate.toml` (user XDG config)
/// 4. `./leadgate.toml` (local directory)
/// 5. `LEADGATE_*` environment variables
pub fn load_config() -> Result<LeadgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadgateConfig::default()))
        .merge(Toml::file("/etc/leadgate/leadgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("leadgate/leadgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("leadgate.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LeadgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LeadgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadgateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LEADGATE_AUTH_WEBHOOK_SECRET` must map
/// to `auth.webhook_secret`, not `auth.webhook.secret`.
fn env_provider() -> Env {
    Env::prefixed("LEADGATE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("email_", "email.", 1)
            .replacen("whatsapp_", "whatsapp.", 1);
        mapped.into()
    })
}
