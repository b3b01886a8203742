use std::time::Duration;

use anyhow::{Context, Result};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::{debug, info, instrument};

use super::ObjectStore;
use crate::config::Settings;

/// S3 bucket used as the document cache.
pub struct S3Store {
    pub client: Client,
    pub bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        put_object(&self.client, &self.bucket, key, body, content_type).await
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String> {
        generate_presigned_url(&self.client, &self.bucket, key, ttl).await
    }

    async fn check(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("S3 HeadBucket {}", self.bucket))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Client setup
// ---------------------------------------------------------------------------

/// Build an S3 client from the AWS default provider chain, applying the
/// region / endpoint overrides from the config.
pub async fn build_s3_client(settings: &Settings) -> Result<Client> {
    let s3 = &settings.config.storage.s3;

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = &s3.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    let aws_config = loader.load().await;

    let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);
    if let Some(endpoint) = &s3.endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }
    let s3_config = builder.force_path_style(s3.force_path_style).build();

    let client = Client::from_conf(s3_config);
    info!(
        bucket = %settings.bucket,
        region = ?aws_config.region(),
        endpoint = ?s3.endpoint_url,
        "S3 client initialised"
    );
    Ok(client)
}

// ---------------------------------------------------------------------------
// Free functions that operate on explicit bucket / key parameters.
// ---------------------------------------------------------------------------

/// Upload an in-memory object to S3.
#[instrument(skip(client, body), fields(%bucket, %key, bytes = body.len()))]
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Bytes,
    content_type: &str,
) -> Result<()> {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type(content_type)
        .send()
        .await
        .context("S3 PutObject")?;

    debug!("object uploaded");
    Ok(())
}

/// Generate a pre-signed GET URL for an S3 object.
#[instrument(skip(client), fields(%bucket, %key, ttl_secs = ttl.as_secs()))]
pub async fn generate_presigned_url(
    client: &Client,
    bucket: &str,
    key: &str,
    ttl: Duration,
) -> Result<String> {
    let presigning = PresigningConfig::builder()
        .expires_in(ttl)
        .build()
        .context("build PresigningConfig")?;

    let req = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .presigned(presigning)
        .await
        .context("generate presigned URL")?;

    let url = req.uri().to_string();
    debug!(%url, "presigned URL generated");
    Ok(url)
}
