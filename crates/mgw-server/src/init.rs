//! Server Initialization
//!
//! Loads configuration, applies command-line overrides, starts logging,
//! wires the in-memory host into [`GatewayState`] and launches Rocket.
//!
//! # Configuration
//!
//! - Config file: `--config <path>`, else `mgw.toml` in the usual places
//! - Environment variables: `MGW_SERVER__PORT=9000` and friends
//! - Command line: `--host` and `--port` win over both

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use mgw_domain::ports::{SharedClock, SystemClock};
use mgw_infrastructure::config::{AppConfig, ConfigLoader, loader::validate_app_config};
use mgw_infrastructure::host::InMemoryHost;
use mgw_infrastructure::logging::init_logging;
use rocket::config::LogLevel;
use tracing::info;

use crate::transport::{GatewayState, gateway_rocket};

/// Load configuration with optional overrides
pub fn load_config(
    config_path: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
) -> anyhow::Result<AppConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("Failed to load configuration")?;

    if let Some(host) = host {
        config.server.host = host.to_string();
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    validate_app_config(&config).context("Invalid command-line override")?;
    Ok(config)
}

/// Run the gateway until shutdown
pub async fn run(
    config_path: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let config = load_config(config_path, host, port)?;
    init_logging(config.logging.clone()).context("Failed to initialize logging")?;

    let clock: SharedClock = Arc::new(SystemClock);
    let services = InMemoryHost::services(clock.clone());

    let rocket_config = rocket::Config {
        address: config.server.ip(),
        port: config.server.port,
        log_level: LogLevel::Off,
        ..rocket::Config::default()
    };

    info!(
        address = %config.server.socket_addr(),
        version_mode = ?config.security.version_mode,
        rate_limit = config.rate_limit.enabled,
        auth = config.auth.enabled,
        "Starting MCP gateway"
    );

    let state = GatewayState::new(config, services, clock).context("Failed to build gateway")?;
    gateway_rocket(state)
        .configure(rocket_config)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket launch failed: {e}"))?;

    info!("MCP gateway stopped");
    Ok(())
}
