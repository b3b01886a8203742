use std::sync::Arc;

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use reqwest::StatusCode;

// ---------------------------------------------------------------------------
// Label types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RouteLabels {
    pub route: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct UpstreamLabels {
    pub operation: String,
    pub class: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub operation: String,
}

/// Collapse a status code into its class (`2xx`, `4xx`, ...).
pub fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

// ---------------------------------------------------------------------------
// Metrics struct
// ---------------------------------------------------------------------------

/// Central container for every Prometheus metric exposed by the proxy.
pub struct Metrics {
    pub requests: Family<RouteLabels, Counter>,
    pub upstream_responses: Family<UpstreamLabels, Counter>,
    pub upstream_failures: Family<OperationLabels, Counter>,
    pub documents_cached: Counter,
    pub document_bytes: Counter,
}

impl Metrics {
    /// Create a new [`Metrics`] instance and register every metric with the
    /// supplied `registry`.  Counter names get their `_total` suffix from the
    /// encoder.
    pub fn new(registry: &mut Registry) -> Self {
        let requests = Family::<RouteLabels, Counter>::default();
        registry.register(
            "registry_proxy_requests",
            "Routed requests by dispatch rule",
            requests.clone(),
        );

        let upstream_responses = Family::<UpstreamLabels, Counter>::default();
        registry.register(
            "registry_proxy_upstream_responses",
            "Upstream API responses by operation and status class",
            upstream_responses.clone(),
        );

        let upstream_failures = Family::<OperationLabels, Counter>::default();
        registry.register(
            "registry_proxy_upstream_failures",
            "Upstream calls that failed before a usable response arrived",
            upstream_failures.clone(),
        );

        let documents_cached = Counter::default();
        registry.register(
            "registry_proxy_documents_cached",
            "Documents written to the object store",
            documents_cached.clone(),
        );

        let document_bytes = Counter::default();
        registry.register(
            "registry_proxy_document_bytes",
            "Bytes of document content written to the object store",
            document_bytes.clone(),
        );

        Self {
            requests,
            upstream_responses,
            upstream_failures,
            documents_cached,
            document_bytes,
        }
    }

    pub fn record_route(&self, route: &str) {
        self.requests
            .get_or_create(&RouteLabels {
                route: route.to_string(),
            })
            .inc();
    }

    pub fn record_upstream(&self, operation: &str, status: StatusCode) {
        self.upstream_responses
            .get_or_create(&UpstreamLabels {
                operation: operation.to_string(),
                class: status_class(status).to_string(),
            })
            .inc();
    }

    pub fn record_upstream_failure(&self, operation: &str) {
        self.upstream_failures
            .get_or_create(&OperationLabels {
                operation: operation.to_string(),
            })
            .inc();
    }

    pub fn record_document_cached(&self, bytes: usize) {
        self.documents_cached.inc();
        self.document_bytes.inc_by(bytes as u64);
    }
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Thread-safe wrapper for the metrics registry, used in [`crate::AppState`].
#[derive(Clone)]
pub struct MetricsRegistry {
    pub registry: Arc<Registry>,
    pub metrics: Arc<Metrics>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    /// Build a fresh registry and pre-register all proxy metrics.
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let metrics = Metrics::new(&mut registry);
        Self {
            registry: Arc::new(registry),
            metrics: Arc::new(metrics),
        }
    }

    /// Render the registry in the OpenMetrics text format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let mut buf = String::new();
        prometheus_client::encoding::text::encode(&mut buf, &self.registry)
            .map_err(|e| anyhow::anyhow!("metrics encoding failed: {e}"))?;
        Ok(buf)
    }
}
