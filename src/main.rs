//! Cash Card API - A small REST service over cash cards
//!
//! Create and read cash cards behind an HTTP Basic, role-gated access gate.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashcard::api::{create_router, route_table};
use cashcard::{AppState, Config};

/// Main entry point for the cash card server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Hash configured credentials and build the application state
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashcard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cash Card API");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: port={}, owner_role={}, users={}, csrf_protection={}",
        config.server_port,
        config.owner_role,
        config.users.len(),
        config.csrf_protection
    );
    if !config.csrf_protection {
        info!("CSRF protection disabled: stateless Basic-auth API with no browser forms");
    }

    let state = AppState::from_config(&config).context("failed to build principal registry")?;
    info!("{} principal(s) registered", state.gate.principal_count());
    if !state.gate.has_principals() {
        warn!("CASHCARD_USERS is empty; every /cashcards request will be rejected");
    }

    for entry in route_table(state.gate.policy()) {
        info!(
            "Route {} {} -> role {}",
            entry.method,
            entry.path,
            entry.required_role.as_deref().unwrap_or("<public>")
        );
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
