//! Upstream credential handling.
//!
//! The registry authenticates API clients with HTTP Basic auth where the API
//! key is the username and the password is empty.

use std::fmt;

use anyhow::{Context, Result};
use base64::Engine as _;
use reqwest::header::HeaderValue;

/// Registry API key.  `Debug` is redacted so the key never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key material.  Only the header encoder should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Build the `Authorization` header value `Basic base64(key + ":")`.
///
/// The returned value is flagged sensitive so that `http`'s own `Debug`
/// output hides it as well.
pub fn build_auth_header(api_key: &ApiKey) -> Result<HeaderValue> {
    let token =
        base64::engine::general_purpose::STANDARD.encode(format!("{}:", api_key.expose()));
    let mut value = HeaderValue::from_str(&format!("Basic {token}"))
        .context("API key produced an invalid Authorization header")?;
    value.set_sensitive(true);
    Ok(value)
}
