mod config;
mod credentials;
mod health;
mod http;
mod metrics;
mod storage;
mod upstream;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::http::proxy::RequestRouter;
use crate::metrics::MetricsRegistry;
use crate::storage::S3Store;
use crate::upstream::HttpUpstream;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "registry-proxy",
    about = "Companies House search, filing-history and document proxy"
)]
struct Cli {
    /// Path to the YAML configuration file.  Defaults apply when omitted.
    #[arg(short, long, env = "REGISTRY_PROXY_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (the default).
    Serve,
    /// Route a single API-Gateway-style JSON event and print the response
    /// envelope.
    Invoke {
        /// Event file, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        event: String,
    },
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Global state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub router: Arc<RequestRouter>,
    pub metrics: MetricsRegistry,
}

async fn build_state(settings: Settings) -> Result<AppState> {
    let s3 = storage::s3::build_s3_client(&settings).await?;
    let store = Arc::new(S3Store::new(s3, settings.bucket.clone()));

    let http_client = HttpUpstream::build_client(settings.request_timeout())?;
    let upstream = Arc::new(HttpUpstream::new(http_client, settings.api_url.clone()));

    let metrics = MetricsRegistry::new();
    let router = RequestRouter::new(&settings, upstream, store, metrics.clone())?;

    Ok(AppState {
        settings: Arc::new(settings),
        router: Arc::new(router),
        metrics,
    })
}

// ---------------------------------------------------------------------------
// HTTP server (axum)
// ---------------------------------------------------------------------------

async fn run_http_server(state: AppState) -> Result<()> {
    let listen_addr: std::net::SocketAddr = state
        .settings
        .config
        .proxy
        .http_listen
        .parse()
        .context("invalid http_listen address")?;

    let app = http::handler::create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {listen_addr}"))?;

    tracing::info!(%listen_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Single-event invocation
// ---------------------------------------------------------------------------

async fn run_invoke(state: AppState, event: &str) -> Result<()> {
    let raw = if event == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read event from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(event)
            .await
            .with_context(|| format!("failed to read event file: {event}"))?
    };

    let envelope = state.router.handle_event(&raw).await?;
    let out = serde_json::to_string(&envelope).context("encode response")?;
    println!("{out}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Graceful shutdown
// ---------------------------------------------------------------------------

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // ---- CLI ----
    let cli = Cli::parse();

    // ---- Tracing ----
    // Logs go to stderr so `invoke` can print the envelope on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    // ---- Config ----
    let settings = config::load_config(cli.config.as_deref())?.resolve()?;
    tracing::info!(
        config_path = cli.config.as_deref().unwrap_or("<defaults>"),
        api_url = %settings.api_url,
        bucket = %settings.bucket,
        "starting registry-proxy"
    );

    // ---- Infrastructure clients + router ----
    let state = build_state(settings).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            run_http_server(state).await?;
            tracing::info!("registry-proxy shut down cleanly");
        }
        Command::Invoke { event } => run_invoke(state, &event).await?,
    }

    Ok(())
}
