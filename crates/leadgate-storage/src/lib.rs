// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Leadgate delivery backend.
//!
//! One `tokio_rusqlite::Connection` serializes all writes on a background
//! thread; refinery migrations run automatically on open. Query modules
//! cover the three entities: leads, products, and delivery events.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::{DeliveryEvent, Lead, Product};
