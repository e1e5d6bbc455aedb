// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each function takes `&Database` and runs its SQL on
//! the single writer thread via `connection().call()`.

pub mod events;
pub mod leads;
pub mod products;

/// Parse a text column into an enum, mapping parse failures onto the usual
/// rusqlite conversion error so they surface as storage errors.
pub(crate) fn parse_col<T: std::str::FromStr>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
