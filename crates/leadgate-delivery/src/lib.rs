// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product file fetching and delivery orchestration.
//!
//! [`Deliverer`] is the core of the backend: given a lead, a product, and
//! the fetched file, it fans out to the eligible delivery channels
//! concurrently, collects every outcome (settle-all, no cancellation), logs
//! a delivery event per success, and reports per-channel failures as
//! advisory values.

pub mod fetch;
pub mod orchestrator;

pub use fetch::{FetchedFile, FileFetcher, file_name_from_path};
pub use orchestrator::{ChannelFailure, Deliverer, DeliveryOutcome};
