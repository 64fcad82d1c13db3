//! Health registry and column-aligned logging for an embedding service,
//! plus the thin HTTP layer that exposes the registry as a liveness probe.

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod models;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use health::{HealthEntry, HealthRegistry, HealthReport, HEALTH_OK};
pub use logging::{get_logger, LogLevel, LogSystem, Logger};

use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub health: HealthRegistry,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(HealthRegistry::new())
    }
}

impl AppState {
    pub fn new(health: HealthRegistry) -> Self {
        Self {
            app_name: "Vitals".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            health,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!(category = "Server", "Server is running on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(category = "Server", "failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(category = "Server", "failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!(category = "Server", "Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!(category = "Server", "Received SIGTERM, starting graceful shutdown");
        },
    }
}
