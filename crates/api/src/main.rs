use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movitur_api::config::ServerConfig;
use movitur_api::router::build_app_router;
use movitur_api::state::AppState;
use movitur_db::client::ShutdownOutcome;
use movitur_db::{PgClientFactory, PgRegistry};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "movitur_api=debug,movitur_db=debug,sqlx=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        mode = ?config.execution_mode,
        "Loaded server configuration",
    );

    // --- Database ---
    // Development: a bad DATABASE_URL aborts start-up here.
    // Production: get_instance never fails and connects in the background.
    let registry = Arc::new(PgRegistry::new(
        config.execution_mode,
        PgClientFactory::new(config.database_url.clone()),
    ));
    let client = registry
        .get_instance()
        .expect("Failed to initialise database client");

    match movitur_db::run_migrations(client.pool()).await {
        Ok(()) => tracing::info!("Database migrations applied"),
        Err(e) if config.execution_mode.is_development() => {
            panic!("Failed to run database migrations: {e}")
        }
        Err(e) => tracing::error!(error = %e, "Failed to run database migrations"),
    }

    // --- App state ---
    let state = AppState {
        db: Arc::clone(&registry),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let outcome = registry
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;
    if outcome != ShutdownOutcome::Disconnected {
        tracing::warn!(?outcome, "Database client did not disconnect cleanly");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
