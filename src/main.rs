// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, error::Error, sync::Arc, time::Duration};

use axum_server::tls_rustls::RustlsConfig;
use blockbank_admin::{
    api::router,
    config::{AppConfig, TlsPaths, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    session_sweeper::SessionSweeper,
    state::AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    if state.verifier.is_bootstrap() {
        warn!(
            "ADMIN_PASSWORD_HASH is not set; the bootstrap admin password is active. \
             Configure a hash before exposing this service."
        );
    }
    if config.uses_default_secret() {
        warn!("ADMIN_SESSION_SECRET is not set; the fallback hash uses a built-in salt");
    }
    info!(
        hash_strategy = state.verifier.strategy().name(),
        session_policy = ?state.policy,
        production = config.environment.is_production(),
        "Admin authentication configured"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(SessionSweeper::new(Arc::clone(&state.sessions)).run(shutdown.clone()));
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let addr = config.server.bind_addr()?;
    let app = router(state);

    match &config.server.tls {
        Some(tls) => serve_tls(addr, tls, app, shutdown).await?,
        None => {
            info!("Block Bank admin listening on http://{addr} (docs at /docs)");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await?;
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn serve_tls(
    addr: std::net::SocketAddr,
    tls: &TlsPaths,
    app: axum::Router,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn Error>> {
    // The ring provider must be installed before any TLS configuration is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;

    let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    info!("Block Bank admin listening on https://{addr} (docs at /docs)");
    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
