//! Upstream registry API access.
//!
//! Provides the [`UpstreamApi`] trait the request router calls through, the
//! reqwest-backed implementation, and the outbound URL builders.

pub mod client;
pub mod urls;

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use url::Url;

pub use client::HttpUpstream;

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("upstream returned malformed JSON")
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Abstraction over the HTTP transport to the registry and document APIs.
#[async_trait::async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Issue an authenticated GET.  Any HTTP status is returned as `Ok`; only
    /// transport failures are errors.
    async fn get(&self, url: Url, auth: &HeaderValue) -> Result<UpstreamResponse>;

    /// Cheap reachability probe used by the health endpoint.
    async fn check(&self) -> Result<()>;
}
