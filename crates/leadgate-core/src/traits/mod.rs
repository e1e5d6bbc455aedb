// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the crate seams.

pub mod channel;

pub use channel::DeliveryChannel;
