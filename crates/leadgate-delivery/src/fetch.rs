// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product file retrieval from the blob store.
//!
//! A product's `storage_path` may be an absolute URL or a bare host/path;
//! the latter is coerced to `https://`. The delivered file name is the last
//! path segment, percent-decoded.

use std::sync::Arc;
use std::time::Duration;

use leadgate_core::LeadgateError;
use percent_encoding::percent_decode_str;
use tracing::debug;

/// A fetched product file: decoded name plus the full byte buffer, shared
/// between delivery tasks via `Arc`.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub file_name: String,
    pub payload: Arc<Vec<u8>>,
}

/// HTTP fetcher for product files.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    client: reqwest::Client,
}

impl FileFetcher {
    pub fn new() -> Result<Self, LeadgateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LeadgateError::Internal(format!("failed to build file fetcher: {e}")))?;
        Ok(Self { client })
    }

    /// Download the file at `storage_path` into memory.
    ///
    /// A non-success status fails with [`LeadgateError::Download`] carrying
    /// the remote status and body text.
    pub async fn fetch(&self, storage_path: &str) -> Result<FetchedFile, LeadgateError> {
        let url = resolve_url(storage_path);
        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| LeadgateError::Download {
                    status: None,
                    detail: format!("request to {url} failed: {e}"),
                })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LeadgateError::Download {
                status: Some(status.as_u16()),
                detail: format!("{url} returned {status}: {detail}"),
            });
        }

        let bytes = response.bytes().await.map_err(|e| LeadgateError::Download {
            status: None,
            detail: format!("reading body from {url} failed: {e}"),
        })?;

        let file_name = file_name_from_path(storage_path);
        debug!(url = %url, size = bytes.len(), file = %file_name, "product file fetched");

        Ok(FetchedFile {
            file_name,
            payload: Arc::new(bytes.to_vec()),
        })
    }
}

/// Coerce a stored path into an absolute URL.
fn resolve_url(storage_path: &str) -> String {
    if storage_path.starts_with("http://") || storage_path.starts_with("https://") {
        storage_path.to_string()
    } else {
        format!("https://{storage_path}")
    }
}

/// Derive the delivered file name from the last path segment, percent-decoded.
///
/// When the decoded bytes are not valid UTF-8 the raw (still-encoded)
/// segment is used rather than propagating the decode error.
pub fn file_name_from_path(storage_path: &str) -> String {
    let raw = storage_path.rsplit('/').next().unwrap_or(storage_path);
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
