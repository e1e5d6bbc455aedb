// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and digit-only country codes.

use crate::diagnostic::ConfigError;
use crate::model::LeadgateConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LeadgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let cc = config.whatsapp.country_code.trim();
    if cc.is_empty() || !cc.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ConfigError::Validation {
            message: format!("whatsapp.country_code must be digits only, got `{cc}`"),
        });
    }

    // A sender set without an api_key (or vice versa) is a half-configured
    // channel that would silently never send.
    if config.email.api_key.is_some() != config.email.sender.is_some() {
        errors.push(ConfigError::Validation {
            message: "email channel needs both email.api_key and email.sender".to_string(),
        });
    }

    if let Some(sender) = &config.email.sender
        && !sender.contains('@')
    {
        errors.push(ConfigError::Validation {
            message: format!("email.sender `{sender}` does not look like a sender address"),
        });
    }

    if config.whatsapp.api_base_url.is_some() != config.whatsapp.token.is_some() {
        errors.push(ConfigError::Validation {
            message: "whatsapp channel needs both whatsapp.api_base_url and whatsapp.token"
                .to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
