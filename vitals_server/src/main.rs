//! Main entry point for the health probe server

use anyhow::Result;
use std::net::SocketAddr;
use vitals_core::{create_app, logging, run_server, AppConfig, AppState, HealthRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    let system = logging::init(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    let log = logging::get_logger("Server")?;

    let bind_address = config.bind_address();
    log.info(["Configuration loaded, binding to", bind_address.as_str()]);
    log.debug([format!("Log directory: {}", config.logging.directory.display())]);

    let addr: SocketAddr = bind_address.parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let health = HealthRegistry::new();
    health.push_health("config", "ok", None);
    health.push_health("logging", "ok", None);

    let state = AppState::new(health.clone());
    log.info([format!("{} v{}", state.app_name, state.version)]);

    let app = create_app(state);

    health.push_health("server", "ok", None);
    let result = run_server(app, addr).await;

    match &result {
        Ok(()) => log.info(["Server shutdown complete"]),
        Err(e) => {
            let reason = e.to_string();
            health.push_health("server", "error", Some(reason.as_str()));
            log.error(["Server stopped with error:", reason.as_str()]);
        }
    }

    system.flush();
    result.map_err(Into::into)
}
