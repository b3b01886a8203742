//! Main axum router and HTTP request handlers.
//!
//! Routes:
//! - `GET /healthz` - Health check
//! - `GET /metrics` - Prometheus metrics
//! - `GET` anything else - handed to [`RequestRouter`](super::proxy::RequestRouter),
//!   which dispatches on the path (search, filing history, document)
//! - any other method - `405` JSON envelope, nothing is fetched or stored

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{error, instrument, warn};

use super::proxy::{ProxyRequest, ProxyResponse};
use crate::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the axum [`Router`] with all HTTP routes and shared state.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .fallback(handle_proxy)
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

/// Open CORS policy on every response, including health and metrics.
async fn allow_any_origin(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Catch-all: build a [`ProxyRequest`] from the URI and dispatch it.  Only
/// `GET` reaches the router.
#[instrument(skip_all, fields(%method, path = %uri.path()))]
async fn handle_proxy(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Result<Response, AppError> {
    if method != Method::GET {
        state.metrics.metrics.record_route("method_not_allowed");
        warn!("rejected non-GET request");
        let mut response =
            ProxyResponse::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
                .into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("GET"));
        return Ok(response);
    }

    let request = proxy_request_from_uri(&uri);
    Ok(state.router.handle(&request).await?.into_response())
}

/// `GET /healthz`
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    crate::health::health_handler(&state.router).await
}

/// `GET /metrics`
///
/// Returns Prometheus metrics collected by the proxy.
async fn handle_metrics(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let buf = state.metrics.encode()?;

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buf,
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Split a request URI into the path and a decoded query map.  Repeated keys
/// keep the last value.
pub fn proxy_request_from_uri(uri: &Uri) -> ProxyRequest {
    let query: HashMap<String, String> = uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    ProxyRequest {
        path: uri.path().to_owned(),
        query,
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Application-level error type.  Every variant renders as the same JSON
/// envelope as a successful response.
#[derive(Debug)]
pub enum AppError {
    /// A path identifier failed validation.
    BadRequest(String),
    /// The upstream API could not be reached or returned an unusable body.
    Upstream(anyhow::Error),
    /// An unexpected internal error (object storage, encoding).
    Internal(anyhow::Error),
}

impl AppError {
    /// Log the error and convert it into a client-facing response.  Details
    /// of upstream and internal failures stay in the log.
    pub fn into_proxy_response(self) -> ProxyResponse {
        match self {
            AppError::BadRequest(msg) => ProxyResponse::error(StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(err) => {
                warn!(error = %format!("{err:#}"), "upstream request failed");
                ProxyResponse::error(StatusCode::BAD_GATEWAY, "Upstream request failed")
            }
            AppError::Internal(err) => {
                error!(error = %format!("{err:#}"), "internal server error");
                ProxyResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_proxy_response().into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
