//! Loan Ledger Backend Server
//!
//! Serves the loan lifecycle API: delete transaction, stop interest, close,
//! delete and reopen lender profiles, and profile status.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use loan_ledger_server::auth::AuthService;
use loan_ledger_server::config::{Config, StorageBackend};
use loan_ledger_server::db;
use loan_ledger_server::loan::{InMemoryStore, LifecycleService, PgLenderStore, PgLoanStore};
use loan_ledger_server::routes;
use loan_ledger_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    if let Err(e) = run(config).await {
        tracing::error!(error = ?e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(environment = config.environment.as_str(), "Starting loan ledger server");

    let lifecycle_service = match &config.storage {
        StorageBackend::Postgres {
            database_url,
            max_connections,
            run_migrations,
        } => {
            tracing::info!(
                "Connecting to database at {}",
                config.database_url_masked().unwrap_or_default()
            );
            let db_pool = db::create_pool(database_url, *max_connections)
                .await
                .context("Failed to connect to database")?;

            if *run_migrations {
                db::run_migrations(&db_pool)
                    .await
                    .context("Failed to run migrations")?;
            }

            LifecycleService::new(
                Arc::new(PgLoanStore::new(db_pool.clone())),
                Arc::new(PgLenderStore::new(db_pool)),
            )
        }
        StorageBackend::Memory => {
            if config.environment.is_production() {
                tracing::warn!("In-memory storage selected in production; data will not survive a restart");
            }
            let store = Arc::new(InMemoryStore::new());
            LifecycleService::new(store.clone(), store)
        }
    };

    let app_state = AppState::new(
        Arc::new(lifecycle_service),
        Arc::new(AuthService::new(config.jwt_secret.clone())),
        config.storage.as_str(),
    );

    let app = routes::create_router(app_state).layer(configure_cors(&config));

    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn configure_cors(config: &Config) -> CorsLayer {
    let allowed = &config.server.cors_allowed_origins;
    if allowed.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
