// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadgate lead-capture and delivery backend.
//!
//! Provides the shared error type, domain types (leads, products, delivery
//! events), the contact normalizer, and the [`DeliveryChannel`] trait that
//! the email and messaging adapters implement.

pub mod contact;
pub mod error;
pub mod traits;
pub mod types;

pub use contact::ContactInfo;
pub use error::LeadgateError;
pub use traits::DeliveryChannel;
pub use types::{
    ContactType, ConversionStatus, DeliveryCategory, DeliveryEvent, DeliveryKind,
    DeliveryRequest, HealthStatus, Lead, Product,
};
