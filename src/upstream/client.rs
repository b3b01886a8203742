use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{self, HeaderValue};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{UpstreamApi, UpstreamResponse};

/// reqwest-backed [`UpstreamApi`].
pub struct HttpUpstream {
    client: reqwest::Client,
    health_url: Url,
}

impl HttpUpstream {
    pub fn new(client: reqwest::Client, health_url: Url) -> Self {
        Self { client, health_url }
    }

    /// Build the shared reqwest client used for all upstream calls.
    pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(concat!("registry-proxy/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")
    }
}

#[async_trait::async_trait]
impl UpstreamApi for HttpUpstream {
    #[instrument(skip(self, auth), fields(%url))]
    async fn get(&self, url: Url, auth: &HeaderValue) -> Result<UpstreamResponse> {
        let resp = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, auth.clone())
            .send()
            .await
            .context("failed to reach upstream registry API")?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .context("failed to read upstream response body")?;

        if status.is_success() {
            debug!(%status, bytes = body.len(), "upstream responded");
        } else {
            warn!(%status, bytes = body.len(), "upstream returned non-success status");
        }

        Ok(UpstreamResponse { status, body })
    }

    async fn check(&self) -> Result<()> {
        // The API root answers unauthenticated probes with a 4xx; anything
        // short of a 5xx means the service is reachable.
        let resp = self
            .client
            .head(self.health_url.clone())
            .send()
            .await
            .with_context(|| format!("HEAD {} failed", self.health_url))?;
        anyhow::ensure!(
            !resp.status().is_server_error(),
            "HEAD {} returned {}",
            self.health_url,
            resp.status()
        );
        Ok(())
    }
}
