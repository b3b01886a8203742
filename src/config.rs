use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::credentials::ApiKey;

/// Longest validity S3 accepts for a SigV4 presigned URL (seven days).
const MAX_PRESIGNED_URL_TTL: u64 = 604_800;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// On-disk configuration.  Every field has a default, so an empty (or absent)
/// file yields a usable config once the secrets are resolved from the
/// environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

// ---------------------------------------------------------------------------
// Upstream registry API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Root of the registry REST API (search, filing history).
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Root of the document API that serves filing PDFs.
    #[serde(default = "default_document_api_url")]
    pub document_api_url: String,
    /// Name of the environment variable that holds the registry API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Page size requested from the search and filing-history endpoints.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    /// Whole-request timeout (seconds) for upstream calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            document_api_url: default_document_api_url(),
            api_key_env: default_api_key_env(),
            items_per_page: default_items_per_page(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.company-information.service.gov.uk".to_string()
}

fn default_document_api_url() -> String {
    "https://document-api.company-information.service.gov.uk".to_string()
}

fn default_api_key_env() -> String {
    "COMPANIES_HOUSE_API_KEY".to_string()
}

fn default_items_per_page() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Proxy listener
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Socket address for the HTTP listener (e.g. `0.0.0.0:8080`).
    #[serde(default = "default_http_listen")]
    pub http_listen: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            http_listen: default_http_listen(),
        }
    }
}

fn default_http_listen() -> String {
    "0.0.0.0:8080".to_string()
}

// ---------------------------------------------------------------------------
// Storage (S3)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub s3: S3StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3StorageConfig {
    /// Bucket holding cached documents.  When empty, the bucket name is read
    /// from the variable named by `bucket_env`.
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_bucket_env")]
    pub bucket_env: String,
    /// Key prefix for cached documents.
    #[serde(default = "default_s3_prefix")]
    pub prefix: String,
    /// Region override; the AWS default provider chain is used when unset.
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack).
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    /// TTL (seconds) for pre-signed document URLs.
    #[serde(default = "default_presigned_url_ttl")]
    pub presigned_url_ttl: u64,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            bucket_env: default_bucket_env(),
            prefix: default_s3_prefix(),
            region: None,
            endpoint_url: None,
            force_path_style: false,
            presigned_url_ttl: default_presigned_url_ttl(),
        }
    }
}

fn default_bucket_env() -> String {
    "DOCUMENT_BUCKET".to_string()
}

fn default_s3_prefix() -> String {
    "documents/".to_string()
}

fn default_presigned_url_ttl() -> u64 {
    3600
}

// ---------------------------------------------------------------------------
// Resolved settings
// ---------------------------------------------------------------------------

/// Configuration with secrets pulled from the environment and URLs parsed.
/// Only a fully valid `Settings` can be used to build the request router.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub api_key: ApiKey,
    pub bucket: String,
    pub api_url: Url,
    pub document_api_url: Url,
}

impl Settings {
    pub fn presigned_url_ttl(&self) -> Duration {
        Duration::from_secs(self.config.storage.s3.presigned_url_ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.upstream.request_timeout_secs)
    }
}

impl Config {
    /// Resolve secrets from the process environment.
    pub fn resolve(self) -> Result<Settings> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve secrets through `lookup`, failing fast on anything missing.
    pub fn resolve_with<F>(self, lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(&self.upstream.api_key_env)
            .filter(|v| !v.trim().is_empty())
            .map(ApiKey::new)
            .with_context(|| {
                format!(
                    "registry API key not configured: set ${}",
                    self.upstream.api_key_env
                )
            })?;

        let bucket = if self.storage.s3.bucket.is_empty() {
            lookup(&self.storage.s3.bucket_env).unwrap_or_default()
        } else {
            self.storage.s3.bucket.clone()
        };
        anyhow::ensure!(
            !bucket.trim().is_empty(),
            "document bucket not configured: set storage.s3.bucket or ${}",
            self.storage.s3.bucket_env
        );

        let api_url = parse_base_url(&self.upstream.api_url, "upstream.api_url")?;
        let document_api_url =
            parse_base_url(&self.upstream.document_api_url, "upstream.document_api_url")?;

        Ok(Settings {
            config: self,
            api_key,
            bucket,
            api_url,
            document_api_url,
        })
    }
}

fn parse_base_url(raw: &str, field: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid {field}: {raw}"))?;
    anyhow::ensure!(
        matches!(url.scheme(), "http" | "https"),
        "{field} must be an http(s) URL: {raw}"
    );
    anyhow::ensure!(!url.cannot_be_a_base(), "{field} cannot be a base URL: {raw}");
    Ok(url)
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load and validate a [`Config`] from a YAML file at `path`, or fall back to
/// the defaults when no path is given.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let path = path.as_ref();
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            parse_config(&contents)
                .with_context(|| format!("failed to parse config file: {}", path.display()))?
        }
        None => Config::default(),
    };
    validate_config(&config)?;
    Ok(config)
}

fn parse_config(contents: &str) -> Result<Config> {
    // serde_yaml treats an empty document as `null`, not as an empty map.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

/// Basic sanity checks that cannot be expressed purely with serde.
fn validate_config(config: &Config) -> Result<()> {
    anyhow::ensure!(
        (1..=100).contains(&config.upstream.items_per_page),
        "items_per_page must be 1-100"
    );
    anyhow::ensure!(
        config.upstream.request_timeout_secs > 0,
        "request_timeout_secs must be positive"
    );
    anyhow::ensure!(
        (1..=MAX_PRESIGNED_URL_TTL).contains(&config.storage.s3.presigned_url_ttl),
        "presigned_url_ttl must be 1-{MAX_PRESIGNED_URL_TTL} seconds"
    );
    config
        .proxy
        .http_listen
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("invalid http_listen address: {}", config.proxy.http_listen))?;
    Ok(())
}
