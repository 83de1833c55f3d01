//! contactd - contact capture daemon
//!
//! Serves a contact form, validates submissions, stores them in SQLite and
//! lists them back.

mod access_log;
mod config;
mod db;
mod error;
mod http;
mod validation;
mod views;

use crate::access_log::AccessLog;
use crate::config::Config;
use crate::db::Database;
use crate::http::AppState;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // An explicit path must exist; the default one is optional.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)
            .map_err(|e| {
                error!(path = DEFAULT_CONFIG_PATH, error = %e, "Failed to load config");
                e
            })?,
        None => {
            info!("No config file found, using defaults");
            Config::default()
        }
    };

    if let Err(errors) = config::validation::validate(&config) {
        for e in &errors {
            error!("Invalid configuration: {}", e);
        }
        return Err(anyhow::anyhow!(
            "Refusing to start with {} configuration error(s). See error messages above.",
            errors.len()
        ));
    }

    info!(
        listen = %config.server.listen,
        database = %config.database.path,
        access_log = %config.access_log.path,
        "Starting contactd"
    );

    let db = Database::new(&config.database.path).await?;
    let access_log = AccessLog::new(&config.access_log.path);
    let state = AppState::new(db, access_log);

    http::run_http_server(config.server.listen, state).await?;

    Ok(())
}
