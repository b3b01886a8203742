//! Request router: dispatches a [`ProxyRequest`] to search, filing history or
//! document retrieval and shapes the result into a [`ProxyResponse`].

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::handler::AppError;
use super::route::{decode_path_segment, match_route, Route};
use crate::config::Settings;
use crate::credentials::build_auth_header;
use crate::metrics::MetricsRegistry;
use crate::storage::{document_key, ObjectStore, DOCUMENT_CONTENT_TYPE};
use crate::upstream::urls::{document_url, filing_history_url, search_url};
use crate::upstream::UpstreamApi;

/// Headers attached to every response the router produces.
pub const RESPONSE_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
];

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Inbound request as seen by the router.  Deserialises from an
/// API-Gateway-style event; a missing or `null` query map is empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub path: String,
    #[serde(
        default,
        rename = "queryStringParameters",
        deserialize_with = "null_as_empty"
    )]
    pub query: HashMap<String, String>,
}

#[cfg(test)]
impl ProxyRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: HashMap::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A JSON response with the fixed content-type and CORS headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

/// Serialised form of a [`ProxyResponse`]:
/// `{ statusCode, headers, body: "<json string>" }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: String,
}

impl ProxyResponse {
    pub fn new(status: StatusCode, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, serde_json::json!({ "error": message.into() }))
    }

    pub fn envelope(&self) -> Envelope {
        Envelope {
            status_code: self.status.as_u16(),
            headers: RESPONSE_HEADERS.into_iter().collect(),
            body: self.body.to_string(),
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body.to_string()).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatches requests to the upstream API and the document store.
pub struct RequestRouter {
    upstream: Arc<dyn UpstreamApi>,
    store: Arc<dyn ObjectStore>,
    auth: HeaderValue,
    api_url: Url,
    document_api_url: Url,
    items_per_page: u32,
    key_prefix: String,
    presigned_url_ttl: Duration,
    metrics: MetricsRegistry,
}

impl RequestRouter {
    pub fn new(
        settings: &Settings,
        upstream: Arc<dyn UpstreamApi>,
        store: Arc<dyn ObjectStore>,
        metrics: MetricsRegistry,
    ) -> Result<Self> {
        let auth = build_auth_header(&settings.api_key)?;
        Ok(Self {
            upstream,
            store,
            auth,
            api_url: settings.api_url.clone(),
            document_api_url: settings.document_api_url.clone(),
            items_per_page: settings.config.upstream.items_per_page,
            key_prefix: settings.config.storage.s3.prefix.clone(),
            presigned_url_ttl: settings.presigned_url_ttl(),
            metrics,
        })
    }

    pub fn upstream(&self) -> &dyn UpstreamApi {
        self.upstream.as_ref()
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Route one request to completion.
    #[instrument(skip(self, request), fields(path = %request.path))]
    pub async fn handle(&self, request: &ProxyRequest) -> Result<ProxyResponse, AppError> {
        let route = match_route(&request.path);
        debug!(route = route.name(), "matched route");

        match route {
            Route::Search => {
                self.metrics.metrics.record_route(route.name());
                let q = request.query.get("q").map(String::as_str).unwrap_or("");
                let url = search_url(&self.api_url, q, self.items_per_page);
                self.pass_through("search", url).await
            }
            Route::FilingHistory { company_number } => {
                let company_number = self.decode(company_number, "company number")?;
                self.metrics.metrics.record_route(route.name());
                let url = filing_history_url(&self.api_url, &company_number, self.items_per_page);
                self.pass_through("filing_history", url).await
            }
            Route::Document { document_id } => {
                let document_id = self.decode(document_id, "document id")?;
                self.metrics.metrics.record_route(route.name());
                self.fetch_document(&document_id).await
            }
            Route::NotFound => {
                self.metrics.metrics.record_route(route.name());
                Ok(ProxyResponse::error(StatusCode::NOT_FOUND, "Route not found"))
            }
        }
    }

    /// Route one raw API-Gateway-style JSON event and return the serialised
    /// response envelope.  Failures are rendered as error envelopes; only an
    /// unparseable event is an `Err`.
    pub async fn handle_event(&self, raw: &str) -> Result<Envelope> {
        let request: ProxyRequest =
            serde_json::from_str(raw).context("failed to parse event JSON")?;
        let response = self
            .handle(&request)
            .await
            .unwrap_or_else(AppError::into_proxy_response);
        Ok(response.envelope())
    }

    fn decode<'a>(&self, raw: &'a str, name: &str) -> Result<Cow<'a, str>, AppError> {
        decode_path_segment(raw, name).map_err(|msg| {
            self.metrics.metrics.record_route("invalid");
            warn!(%msg, "rejected request identifier");
            AppError::BadRequest(msg)
        })
    }

    async fn call_upstream(
        &self,
        operation: &str,
        url: Url,
    ) -> Result<crate::upstream::UpstreamResponse, AppError> {
        match self.upstream.get(url, &self.auth).await {
            Ok(resp) => {
                self.metrics.metrics.record_upstream(operation, resp.status);
                Ok(resp)
            }
            Err(e) => {
                self.metrics.metrics.record_upstream_failure(operation);
                Err(AppError::Upstream(e))
            }
        }
    }

    /// Forward upstream status and JSON body unchanged.
    async fn pass_through(&self, operation: &str, url: Url) -> Result<ProxyResponse, AppError> {
        let resp = self.call_upstream(operation, url).await?;
        let body = resp.json().map_err(|e| {
            self.metrics.metrics.record_upstream_failure(operation);
            AppError::Upstream(e)
        })?;
        Ok(ProxyResponse::new(resp.status, body))
    }

    /// Fetch a document, cache it in the object store and return a
    /// pre-signed link.  Non-200 upstream statuses are returned as
    /// `{"error": <upstream text>}` without touching the store.
    async fn fetch_document(&self, document_id: &str) -> Result<ProxyResponse, AppError> {
        let url = document_url(&self.document_api_url, document_id);
        let resp = self.call_upstream("document", url).await?;

        if resp.status != StatusCode::OK {
            warn!(status = %resp.status, %document_id, "document fetch not successful");
            return Ok(ProxyResponse::error(resp.status, resp.text()));
        }

        let key = document_key(&self.key_prefix, document_id);
        let bytes = resp.body.len();
        self.store
            .put(&key, resp.body, DOCUMENT_CONTENT_TYPE)
            .await
            .with_context(|| format!("failed to cache document at {key}"))?;
        self.metrics.metrics.record_document_cached(bytes);

        let url = self
            .store
            .presign_get(&key, self.presigned_url_ttl)
            .await
            .with_context(|| format!("failed to presign {key}"))?;

        info!(%key, bytes, "document cached");
        Ok(ProxyResponse::new(
            StatusCode::OK,
            serde_json::json!({ "url": url }),
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use bytes::Bytes;

    use super::*;
    use crate::config::Config;
    use crate::upstream::UpstreamResponse;

    // ── Test doubles ────────────────────────────────────────────────────

    /// Upstream double that replays one canned response and records every
    /// URL and Authorization header it was called with.
    pub(crate) struct StubUpstream {
        pub status: StatusCode,
        pub body: Bytes,
        pub fail: bool,
        pub calls: Mutex<Vec<(Url, String)>>,
    }

    impl StubUpstream {
        pub(crate) fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
            Self {
                status,
                body: body.into(),
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(StatusCode::OK, Bytes::new())
            }
        }

        pub(crate) fn urls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(u, _)| u.to_string())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl UpstreamApi for StubUpstream {
        async fn get(&self, url: Url, auth: &HeaderValue) -> anyhow::Result<UpstreamResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((url, auth.to_str().unwrap_or_default().to_string()));
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(UpstreamResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }

        async fn check(&self) -> anyhow::Result<()> {
            if self.fail {
                Err(anyhow!("unreachable"))
            } else {
                Ok(())
            }
        }
    }

    /// In-memory object store.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub objects: Mutex<HashMap<String, (Bytes, String)>>,
        pub puts: Mutex<usize>,
        pub fail: bool,
    }

    impl MemoryStore {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn get(&self, key: &str) -> Option<(Bytes, String)> {
            self.objects.lock().unwrap().get(key).cloned()
        }

        pub(crate) fn put_count(&self) -> usize {
            *self.puts.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl ObjectStore for MemoryStore {
        async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow!("AccessDenied"));
            }
            *self.puts.lock().unwrap() += 1;
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (body, content_type.to_string()));
            Ok(())
        }

        async fn presign_get(&self, key: &str, ttl: Duration) -> anyhow::Result<String> {
            Ok(format!(
                "https://docs.s3.test/{key}?X-Amz-Expires={}",
                ttl.as_secs()
            ))
        }

        async fn check(&self) -> anyhow::Result<()> {
            if self.fail {
                Err(anyhow!("NoSuchBucket"))
            } else {
                Ok(())
            }
        }
    }

    pub(crate) fn test_settings() -> Settings {
        Config::default()
            .resolve_with(|name| match name {
                "COMPANIES_HOUSE_API_KEY" => Some("key".to_string()),
                "DOCUMENT_BUCKET" => Some("docs".to_string()),
                _ => None,
            })
            .unwrap()
    }

    fn router(upstream: Arc<StubUpstream>, store: Arc<MemoryStore>) -> RequestRouter {
        RequestRouter::new(&test_settings(), upstream, store, MetricsRegistry::new()).unwrap()
    }

    // ── Search ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn search_passes_through_status_and_body() {
        let upstream = Arc::new(StubUpstream::new(
            StatusCode::OK,
            r#"{"items":[{"title":"ACME LTD"}]}"#,
        ));
        let store = Arc::new(MemoryStore::default());
        let router = router(upstream.clone(), store.clone());

        let resp = router
            .handle(&ProxyRequest::new("/search").with_query("q", "acme"))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, serde_json::json!({"items": [{"title": "ACME LTD"}]}));
        let urls = upstream.urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].ends_with("/search/companies?q=acme&items_per_page=5"));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn search_sends_basic_auth() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, "{}"));
        let router = router(upstream.clone(), Arc::new(MemoryStore::default()));

        router.handle(&ProxyRequest::new("/search")).await.unwrap();

        let calls = upstream.calls.lock().unwrap();
        assert_eq!(calls[0].1, "Basic a2V5Og==");
    }

    #[tokio::test]
    async fn search_without_q_sends_empty_query() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, "{}"));
        let router = router(upstream.clone(), Arc::new(MemoryStore::default()));

        router.handle(&ProxyRequest::new("/api/search")).await.unwrap();

        assert!(upstream.urls()[0].ends_with("?q=&items_per_page=5"));
    }

    #[tokio::test]
    async fn search_passes_through_upstream_error_status() {
        let upstream = Arc::new(StubUpstream::new(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"Invalid Authorization"}"#,
        ));
        let router = router(upstream, Arc::new(MemoryStore::default()));

        let resp = router.handle(&ProxyRequest::new("/search")).await.unwrap();

        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.body["error"], "Invalid Authorization");
    }

    #[tokio::test]
    async fn search_with_malformed_json_is_upstream_error() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, "<html>"));
        let router = router(upstream, Arc::new(MemoryStore::default()));

        let err = router.handle(&ProxyRequest::new("/search")).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_upstream_error() {
        let upstream = Arc::new(StubUpstream::failing());
        let router = router(upstream, Arc::new(MemoryStore::default()));

        let err = router.handle(&ProxyRequest::new("/search")).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    // ── Filing history ──────────────────────────────────────────────────

    #[tokio::test]
    async fn filing_history_targets_company() {
        let upstream = Arc::new(StubUpstream::new(
            StatusCode::OK,
            r#"{"items":[],"total_count":0}"#,
        ));
        let router = router(upstream.clone(), Arc::new(MemoryStore::default()));

        let resp = router
            .handle(&ProxyRequest::new("/company/12345678/filing-history"))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["total_count"], 0);
        assert_eq!(
            upstream.urls(),
            vec![
                "https://api.company-information.service.gov.uk/company/12345678/filing-history?items_per_page=5"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn filing_history_with_empty_company_number_is_rejected() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, "{}"));
        let router = router(upstream.clone(), Arc::new(MemoryStore::default()));

        let err = router
            .handle(&ProxyRequest::new("/company//filing-history"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(upstream.urls().is_empty());
    }

    // ── Document ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn document_is_cached_and_presigned() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, &b"%PDF-1.4 body"[..]));
        let store = Arc::new(MemoryStore::default());
        let router = router(upstream.clone(), store.clone());

        let resp = router
            .handle(&ProxyRequest::new("/document/abc123"))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            resp.body,
            serde_json::json!({
                "url": "https://docs.s3.test/documents/abc123.pdf?X-Amz-Expires=3600"
            })
        );
        let (bytes, content_type) = store.get("documents/abc123.pdf").unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4 body");
        assert_eq!(content_type, "application/pdf");
        assert_eq!(
            upstream.urls(),
            vec!["https://document-api.company-information.service.gov.uk/document/abc123".to_string()]
        );
    }

    #[tokio::test]
    async fn document_error_is_wrapped_without_storage_write() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::NOT_FOUND, "document not found"));
        let store = Arc::new(MemoryStore::default());
        let router = router(upstream, store.clone());

        let resp = router
            .handle(&ProxyRequest::new("/document/abc123"))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body, serde_json::json!({"error": "document not found"}));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn document_non_200_success_is_not_cached() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::NO_CONTENT, ""));
        let store = Arc::new(MemoryStore::default());
        let router = router(upstream, store.clone());

        let resp = router
            .handle(&ProxyRequest::new("/document/abc123"))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::NO_CONTENT);
        assert_eq!(resp.body, serde_json::json!({"error": ""}));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn repeated_document_fetch_overwrites_same_key() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, &b"%PDF"[..]));
        let store = Arc::new(MemoryStore::default());
        let router = router(upstream.clone(), store.clone());

        let first = router
            .handle(&ProxyRequest::new("/document/abc123"))
            .await
            .unwrap();
        let second = router
            .handle(&ProxyRequest::new("/document/abc123"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.urls().len(), 2);
        assert_eq!(store.put_count(), 2);
        assert_eq!(store.objects.lock().unwrap().len(), 1);
        assert_eq!(&store.get("documents/abc123.pdf").unwrap().0[..], b"%PDF");
    }

    #[tokio::test]
    async fn document_id_with_trailing_segments_is_rejected() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, &b"%PDF"[..]));
        let store = Arc::new(MemoryStore::default());
        let router = router(upstream.clone(), store.clone());

        let err = router
            .handle(&ProxyRequest::new("/document/abc/extra"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(upstream.urls().is_empty());
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn document_id_is_decoded_once() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, &b"%PDF"[..]));
        let store = Arc::new(MemoryStore::default());
        let router = router(upstream.clone(), store.clone());

        router
            .handle(&ProxyRequest::new("/document/abc%20def"))
            .await
            .unwrap();

        assert_eq!(
            upstream.urls(),
            vec!["https://document-api.company-information.service.gov.uk/document/abc%20def".to_string()]
        );
        assert!(store.get("documents/abc def.pdf").is_some());
    }

    #[tokio::test]
    async fn encoded_slash_in_company_number_is_rejected() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, "{}"));
        let router = router(upstream.clone(), Arc::new(MemoryStore::default()));

        let err = router
            .handle(&ProxyRequest::new("/company/12%2F34/filing-history"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(upstream.urls().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_internal_error() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, &b"%PDF"[..]));
        let router = router(upstream, Arc::new(MemoryStore::failing()));

        let err = router
            .handle(&ProxyRequest::new("/document/abc123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    // ── Fallthrough ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_route_is_404() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, "{}"));
        let router = router(upstream.clone(), Arc::new(MemoryStore::default()));

        let resp = router.handle(&ProxyRequest::new("/unknown")).await.unwrap();

        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body, serde_json::json!({"error": "Route not found"}));
        assert!(upstream.urls().is_empty());
    }

    // ── Envelope ────────────────────────────────────────────────────────

    // ── Events ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn event_with_null_query_is_routed() {
        let upstream = Arc::new(StubUpstream::new(StatusCode::OK, r#"{"items":[]}"#));
        let router = router(upstream.clone(), Arc::new(MemoryStore::default()));

        let envelope = router
            .handle_event(r#"{"path": "/search", "queryStringParameters": null}"#)
            .await
            .unwrap();

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.headers["Content-Type"], "application/json");
        assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(envelope.body, r#"{"items":[]}"#);
        assert!(upstream.urls()[0].ends_with("/search/companies?q=&items_per_page=5"));
    }

    #[tokio::test]
    async fn event_errors_become_envelopes() {
        let router = router(
            Arc::new(StubUpstream::failing()),
            Arc::new(MemoryStore::default()),
        );

        let envelope = router
            .handle_event(r#"{"path": "/document/abc123"}"#)
            .await
            .unwrap();

        assert_eq!(envelope.status_code, 502);
        assert_eq!(envelope.body, r#"{"error":"Upstream request failed"}"#);
    }

    #[tokio::test]
    async fn malformed_event_is_an_error() {
        let router = router(
            Arc::new(StubUpstream::new(StatusCode::OK, "{}")),
            Arc::new(MemoryStore::default()),
        );

        assert!(router.handle_event("not json").await.is_err());
    }

    #[test]
    fn envelope_shape() {
        let resp = ProxyResponse::error(StatusCode::NOT_FOUND, "Route not found");
        let value = serde_json::to_value(resp.envelope()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "statusCode": 404,
                "headers": {
                    "Content-Type": "application/json",
                    "Access-Control-Allow-Origin": "*"
                },
                "body": "{\"error\":\"Route not found\"}"
            })
        );
    }

    #[test]
    fn request_deserialises_null_query() {
        let req: ProxyRequest =
            serde_json::from_str(r#"{"path":"/search","queryStringParameters":null}"#).unwrap();
        assert_eq!(req.path, "/search");
        assert!(req.query.is_empty());
    }

    #[test]
    fn request_deserialises_gateway_event() {
        let req: ProxyRequest = serde_json::from_str(
            r#"{"httpMethod":"GET","path":"/search","queryStringParameters":{"q":"acme"},"headers":{}}"#,
        )
        .unwrap();
        assert_eq!(req.query.get("q").map(String::as_str), Some("acme"));
    }

    #[test]
    fn into_response_sets_json_and_cors_headers() {
        let resp = ProxyResponse::new(StatusCode::OK, serde_json::json!({"ok": true})).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
