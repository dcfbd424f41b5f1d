use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::config;
use crate::database::{seed, DatabaseManager};
use crate::state::AppState;
use crate::{app, cors_layer, is_development};

pub async fn handle() -> anyhow::Result<()> {
    let config = config();
    info!("Starting task API in {:?} mode", config.environment);

    if config.security.jwt_secret.trim().is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside of development");
    }
    if is_development!() {
        warn!("Development mode: default JWT secret and sample data may be in use");
    }

    // Rejects bad token lifetimes and bcrypt cost before the first query
    let pool = DatabaseManager::connect_lazy(&config.database)?;
    let state = AppState::new(pool.clone(), config).context("invalid security settings")?;

    if config.database.run_migrations {
        if let Err(e) = DatabaseManager::migrate(&pool).await {
            warn!("Skipping migrations, database not ready: {}", e);
        }
    }

    if config.seed.sample_data {
        let today = chrono::Local::now().date_naive();
        if let Err(e) = seed::seed_sample_data(&pool, config.security.bcrypt_cost, today).await {
            warn!("Sample data not created: {}", e);
        }
    }

    let app = app(state).layer(cors_layer(&config.security.cors_origins));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(
        addr = %bind_addr,
        base_url = %config.server.base_url(),
        "Task API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received, draining connections");
}
