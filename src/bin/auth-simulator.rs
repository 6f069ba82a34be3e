//! Mock OAuth2 / OpenID Connect authorization server binary.
//!
//! Provisions signing and TLS material, then serves the full login flow over
//! HTTPS with graceful shutdown.

use anyhow::Result;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth_simulator::config::Config;
use auth_simulator::http::context::AppState;
use auth_simulator::http::server::build_router;
use auth_simulator::storage::key_provider::ensure_tls_certificate;

use tokio::signal;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "auth_simulator=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();

    let version = auth_simulator::config::version()?;

    std::env::args().for_each(|arg| {
        if arg == "--version" {
            println!("{version}");
            std::process::exit(0);
        }
    });

    tracing::info!(?version, "Starting auth simulator");

    let config = Arc::new(Config::new()?);

    // Provision everything up front. A broken key or certificate environment
    // aborts startup instead of serving unverifiable material.
    ensure_tls_certificate(&config.tls_key_path, &config.tls_cert_path)?;
    let app_context = AppState::new(config.clone())?;
    let app = build_router(app_context);

    let tls_config =
        RustlsConfig::from_pem_file(&config.tls_cert_path, &config.tls_key_path).await?;

    // Setup graceful shutdown
    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    {
        let tracker = tracker.clone();
        let inner_token = token.clone();

        let ctrl_c = async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!("failed to install Ctrl+C handler: {}", err);
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(err) => tracing::error!("failed to install signal handler: {}", err),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::spawn(async move {
            tokio::select! {
                () = inner_token.cancelled() => { },
                _ = terminate => {},
                _ = ctrl_c => {},
            }

            tracker.close();
            inner_token.cancel();
        });
    }

    // Start HTTPS server
    {
        let http_port = *config.http_port.as_ref();
        let issuer = config.issuer.clone();
        let inner_token = token.clone();
        let handle = axum_server::Handle::new();

        {
            let handle = handle.clone();
            let shutdown_token = inner_token.clone();
            tokio::spawn(async move {
                shutdown_token.cancelled().await;
                handle.graceful_shutdown(Some(Duration::from_secs(5)));
            });
        }

        tracker.spawn(async move {
            let bind_address = SocketAddr::from(([0, 0, 0, 0], http_port));
            tracing::info!("Serving {issuer} on {bind_address}");

            let result = axum_server::bind_rustls(bind_address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await;
            if let Err(err) = result {
                tracing::error!("server task failed: {}", err);
            }

            inner_token.cancel();
        });
    }

    tracker.wait().await;

    Ok(())
}
