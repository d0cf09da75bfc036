//! hostgate server entry point.
//!
//! Initialises tracing, loads configuration from environment variables
//! (prefixed with `HOSTGATE_`), builds the in-memory stores and serves the
//! gateway API over HTTP or HTTPS.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use hostgate_common::GatewayConfig;
use tracing_subscriber::EnvFilter;

use hostgate_server::{AppState, router};

/// Environment prefix for every configuration key.
///
///   - `HOSTGATE_LISTEN_ADDR`       (default `0.0.0.0:5000`)
///   - `HOSTGATE_UNIQUE_ADDRESSES`  (default `false`)
///   - `HOSTGATE_TLS_CERT`          (optional, path to TLS cert)
///   - `HOSTGATE_TLS_KEY`           (optional, path to TLS key)
const ENV_PREFIX: &str = "HOSTGATE_";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("hostgate starting");

    // 2. Load configuration from HOSTGATE_* env vars.
    let config: GatewayConfig = envy::prefixed(ENV_PREFIX)
        .from_env()
        .context("failed to load config from HOSTGATE_* env vars")?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        unique_addresses = config.unique_addresses,
        tls_enabled = config.tls_paths().is_some(),
        "configuration loaded",
    );

    // 3. Build the stores once; every request shares them.
    let state = Arc::new(AppState::new(&config));
    let app = router(state);

    // 4. Bind and serve (TLS or plaintext).
    if let Some((cert_path, key_path)) = config.tls_paths() {
        tracing::info!("TLS enabled, loading cert from {}", cert_path);
        let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .context("failed to load TLS certificates")?;

        tracing::info!("gateway ready on https://{}", config.listen_addr);

        axum_server::bind_rustls(config.listen_addr, tls_config)
            .serve(app.into_make_service())
            .await
            .context("HTTPS server error")?;
    } else {
        tracing::info!("gateway ready on http://{} (TLS disabled)", config.listen_addr);

        let listener = tokio::net::TcpListener::bind(config.listen_addr)
            .await
            .context("failed to bind TCP listener")?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;
    }

    tracing::info!("hostgate shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        // Without a handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
