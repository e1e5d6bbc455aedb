// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact normalization: trims raw email/phone input and derives the
//! lead's [`ContactType`] from which fields survive normalization.

use serde::{Deserialize, Serialize};

use crate::types::ContactType;

/// Normalized contact fields for a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInfo {
    /// Trim both fields; whitespace-only input normalizes to absent.
    pub fn normalize(email: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            email: clean(email),
            phone: clean(phone),
        }
    }

    /// Derive the contact type from which fields are present.
    ///
    /// The neither-present arm falls back to `Email`. It is reachable only
    /// when upstream validation was bypassed; callers that require a contact
    /// must check [`ContactInfo::is_empty`] first.
    pub fn contact_type(&self) -> ContactType {
        match (&self.email, &self.phone) {
            (Some(_), Some(_)) => ContactType::Both,
            (Some(_), None) => ContactType::Email,
            (None, Some(_)) => ContactType::Phone,
            (None, None) => ContactType::Email,
        }
    }

    /// True when no contact field survived normalization.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

fn clean(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
