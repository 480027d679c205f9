//! HeLI Service
//!
//! Starts the HeLI classifier process once and serves `/process` in front
//! of it until SIGINT/SIGTERM.

use anyhow::Result;
use clap::Parser;
use heli_classifier::{ClassifierChannel, HeliProcess};
use heli_service::{create_router, AppState, Cli, LidService, ServiceConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting HeLI language identification service");

    // Load configuration
    let config = ServiceConfig::load(&cli)?;
    info!("Configuration loaded successfully");
    info!("Launch mode: {:?}", config.classifier.launch);
    info!("Classifier jar: {}", config.classifier.jar.display());
    info!("Ranked languages per line: {}", config.classifier.best_langs);
    if !config.classifier.languages.is_empty() {
        info!("Restricted to: {}", config.classifier.languages.join(","));
    }

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // The classifier is started once, before the first request
    let process = HeliProcess::spawn(config.classifier.clone())?;
    let service = LidService::new(ClassifierChannel::new(process));
    let state = AppState::new(service, config.server.clone()).with_metrics(metrics_handle);

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("heli=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heli=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!("heli_requests_total", "Total number of process requests");
    metrics::describe_counter!("heli_lines_total", "Total number of annotated lines");
    metrics::describe_counter!("heli_errors_total", "Total number of failed requests by kind");
    metrics::describe_histogram!(
        "heli_request_latency_us",
        metrics::Unit::Microseconds,
        "Classifier time per request in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
