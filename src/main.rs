use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use hotspace_service::config::Settings;
use hotspace_service::postgres::PostgresPool;
use hotspace_service::server::{create_app, AppState};
use hotspace_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing; keep the guard alive until shutdown
    let _telemetry = init_telemetry(&settings.otel, &settings.logging)?;
    tracing::info!(backend = %settings.storage.backend, "Configuration loaded");

    // Connect to PostgreSQL only when it is the configured backend
    let postgres = if settings.uses_postgres() {
        let pool = PostgresPool::new(&settings.database).await?;
        if settings.database.run_migrations {
            pool.run_migrations().await?;
        }
        Some(Arc::new(pool))
    } else {
        None
    };

    // Create application state
    let state = AppState::new(settings.clone(), postgres.clone());
    tracing::info!("Application state initialized");

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    if let Some(pool) = postgres {
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
