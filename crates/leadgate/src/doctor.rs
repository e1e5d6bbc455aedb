// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadgate doctor` command implementation.
//!
//! Runs diagnostic checks against the environment: database, credentials,
//! and the reachability of each configured delivery channel.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use leadgate_config::LeadgateConfig;
use leadgate_core::traits::DeliveryChannel;
use leadgate_core::types::HealthStatus;
use leadgate_core::LeadgateError;
use leadgate_email::EmailChannel;
use leadgate_storage::Database;
use leadgate_whatsapp::WhatsAppChannel;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run the `leadgate doctor` command.
///
/// Exits non-zero (via the returned error) when any check fails.
pub async fn run_doctor(config: &LeadgateConfig, plain: bool) -> Result<(), LeadgateError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_database(&config.storage.database_path).await,
        check_credentials(config),
        check_email(config).await,
        check_whatsapp(config).await,
    ];

    println!();
    println!("  leadgate doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    for result in &results {
        print_result(result, use_color, &mut fail_count);
    }

    println!("  {}", "-".repeat(50));
    if fail_count > 0 {
        Err(LeadgateError::Internal(format!(
            "{fail_count} check(s) failed"
        )))
    } else {
        println!("  all checks passed");
        Ok(())
    }
}

fn print_result(result: &CheckResult, use_color: bool, fail_count: &mut u32) {
    let duration_ms = result.duration.as_millis();
    let line = match result.status {
        CheckStatus::Pass => {
            if use_color {
                use colored::Colorize;
                format!(
                    "    {} {:<12} {} ({duration_ms}ms)",
                    "✓".green(),
                    result.name,
                    result.message
                )
            } else {
                format!(
                    "    [OK]   {:<12} {} ({duration_ms}ms)",
                    result.name, result.message
                )
            }
        }
        CheckStatus::Warn => {
            if use_color {
                use colored::Colorize;
                format!(
                    "    {} {:<12} {} ({duration_ms}ms)",
                    "!".yellow(),
                    result.name,
                    result.message.yellow()
                )
            } else {
                format!(
                    "    [WARN] {:<12} {} ({duration_ms}ms)",
                    result.name, result.message
                )
            }
        }
        CheckStatus::Fail => {
            *fail_count += 1;
            if use_color {
                use colored::Colorize;
                format!(
                    "    {} {:<12} {} ({duration_ms}ms)",
                    "✗".red(),
                    result.name,
                    result.message.red()
                )
            } else {
                format!(
                    "    [FAIL] {:<12} {} ({duration_ms}ms)",
                    result.name, result.message
                )
            }
        }
    };
    println!("{line}");
}

async fn check_database(path: &str) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match Database::open(path).await {
        Ok(db) => match db.ping().await {
            Ok(()) => (CheckStatus::Pass, format!("sqlite ok at {path}")),
            Err(e) => (CheckStatus::Fail, format!("ping failed: {e}")),
        },
        Err(e) => (CheckStatus::Fail, format!("open failed: {e}")),
    };
    CheckResult {
        name: "database".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn check_credentials(config: &LeadgateConfig) -> CheckResult {
    let start = Instant::now();
    let mut missing = Vec::new();
    if config.auth.webhook_secret.is_none() {
        missing.push("auth.webhook_secret");
    }
    if config.auth.api_token.is_none() {
        missing.push("auth.api_token");
    }
    let (status, message) = if missing.is_empty() {
        (CheckStatus::Pass, "webhook secret and api token set".into())
    } else {
        (
            CheckStatus::Warn,
            format!("not set: {} (requests will be rejected)", missing.join(", ")),
        )
    };
    CheckResult {
        name: "credentials".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_email(config: &LeadgateConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = if !config.email.is_configured() {
        (CheckStatus::Warn, "not configured".into())
    } else {
        match EmailChannel::new(&config.email) {
            Ok(channel) => health_to_check(channel.health_check().await),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        }
    };
    CheckResult {
        name: "email".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_whatsapp(config: &LeadgateConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = if !config.whatsapp.is_configured() {
        (CheckStatus::Warn, "not configured".into())
    } else {
        match WhatsAppChannel::new(&config.whatsapp) {
            Ok(channel) => health_to_check(channel.health_check().await),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        }
    };
    CheckResult {
        name: "whatsapp".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn health_to_check(health: Result<HealthStatus, LeadgateError>) -> (CheckStatus, String) {
    match health {
        Ok(HealthStatus::Healthy) => (CheckStatus::Pass, "reachable".into()),
        Ok(HealthStatus::Degraded(msg)) => (CheckStatus::Warn, msg),
        Ok(HealthStatus::Unhealthy(msg)) => (CheckStatus::Fail, msg),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    }
}
