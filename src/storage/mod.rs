//! Object storage for fetched documents.
//!
//! Documents are written to an S3 bucket and handed back to callers as
//! pre-signed GET URLs, so the proxy never streams PDF bytes itself.

pub mod s3;

use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;

pub use s3::S3Store;

/// Content type recorded on every cached document.
pub const DOCUMENT_CONTENT_TYPE: &str = "application/pdf";

/// Object key for a cached document.  A pure function of `document_id`, so
/// repeat fetches overwrite the same object.
pub fn document_key(prefix: &str, document_id: &str) -> String {
    format!("{prefix}{document_id}.pdf")
}

/// Abstraction over the bucket holding cached documents.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` at `key`, replacing any existing object.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<()>;

    /// Mint a time-limited GET URL for `key`.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String>;

    /// Confirm the bucket is reachable with the configured credentials.
    async fn check(&self) -> Result<()>;
}
