//! Recipe API Backend
//!
//! Users, token authentication, per-user recipes and a staff-only admin
//! surface over PostgreSQL.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: Business logic and validation
//! - Repositories: Data access
//! - Database: PostgreSQL with SQLx

use anyhow::Result;
use recipe_api_backend::{config, db, routes, state::AppState, telemetry};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    telemetry::init_tracing();

    let config = config::AppConfig::load()?;
    let production = config::AppConfig::is_production();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        "Starting Recipe API"
    );

    if production {
        config.validate_for_production()?;
        if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
            warn!("Database URL contains localhost - ensure this is intentional for production");
        }
    }

    let metrics = telemetry::init_metrics()?;

    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    // Production runs migrations as a separate job
    if !production {
        db::run_migrations(&db_pool).await?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db_pool, config).with_metrics(metrics);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
