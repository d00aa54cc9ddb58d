use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use seclab_core::fetch::HttpFetcher;
use seclab_core::web::{router, AppState};
use seclab_core::{LabConfig, RecordStore, UrlValidator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seclab_core=info,seclab_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LabConfig::parse();

    let fetcher = HttpFetcher::new(config.fetch_timeout()).context("building HTTP client")?;
    let allowlist = config.allowlist();
    tracing::info!(
        domains = ?allowlist.domains(),
        fetch_timeout_secs = config.fetch_timeout_secs,
        "outbound fetch policy"
    );

    let validator = UrlValidator::with_system_resolver(allowlist);
    let state = AppState::new(RecordStore::seeded(), validator, Arc::new(fetcher));

    tracing::info!(records = state.records().len(), "lab state ready");

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!("seclab server listening on http://{addr}");
    tracing::warn!("vulnerable endpoints are enabled; do not expose this server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
