// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number canonicalization for the messaging gateway.

/// Normalize a raw phone number to the gateway's canonical international
/// form: digits only, prefixed with the country code when not already
/// present.
///
/// The prefix check is a plain string match on the leading digits, matching
/// what the gateway itself does; a local number that happens to start with
/// the country code digits is taken as already international.
pub fn normalize_phone(raw: &str, country_code: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.starts_with(country_code) {
        digits
    } else {
        format!("{country_code}{digits}")
    }
}
