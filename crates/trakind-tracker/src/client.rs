// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the IND appointment slot API.
//!
//! Responses start with a fixed 6-byte anti-JSON-hijacking prefix
//! (`)]}',\n`) that is dropped before decoding.

use std::io::Read;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use trakind_config::model::TrackerConfig;
use trakind_core::{Action, Location, SlotsResponse, TrakindError};

/// Bytes preceding the JSON document in every response body.
pub const PREAMBLE_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("failed to read response preamble: {0}")]
    Preamble(#[source] std::io::Error),

    #[error("failed to decode slots: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<FetchError> for TrakindError {
    fn from(err: FetchError) -> Self {
        TrakindError::Upstream {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Strips the preamble and decodes the remaining JSON.
pub fn decode_slots_body(body: &[u8]) -> Result<SlotsResponse, FetchError> {
    let mut reader = body;
    let mut preamble = [0u8; PREAMBLE_LEN];
    reader
        .read_exact(&mut preamble)
        .map_err(FetchError::Preamble)?;
    serde_json::from_slice(reader).map_err(FetchError::Decode)
}

/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SlotsClient {
    client: reqwest::Client,
    base_url: String,
}

impl SlotsClient {
    pub fn new(config: &TrackerConfig) -> Result<Self, TrakindError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TrakindError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn slots_url(&self, location: &Location) -> String {
        format!("{}/desks/{}/slots/", self.base_url, location.code)
    }

    /// Fetches the open windows for one office, action and party size.
    pub async fn fetch(
        &self,
        location: &Location,
        action: &Action,
        people_count: u8,
    ) -> Result<SlotsResponse, FetchError> {
        let response = self
            .client
            .get(self.slots_url(location))
            .query(&[
                ("productKey", action.code.to_string()),
                ("persons", people_count.to_string()),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let slots = decode_slots_body(&body)?;
        debug!(
            location = location.code,
            action = action.code,
            people_count,
            windows = slots.data.len(),
            "slots fetched"
        );
        Ok(slots)
    }
}
