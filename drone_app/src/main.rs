//! Drone viewer
//!
//! Opens a window and flies the drone with the keyboard. The configuration
//! file is the first command-line argument; without one,
//! `resources/config/drone.toml` is used when present, else built-in defaults.

mod app;
mod input;

use std::path::PathBuf;

use drone_engine::config::Config;
use drone_engine::core::config::ApplicationConfig;
use drone_engine::foundation::logging;

use crate::app::{AppError, DroneApp};

const DEFAULT_CONFIG_PATH: &str = "resources/config/drone.toml";

/// Explicit path from the command line, else the default file if it exists
fn config_path() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from).or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        default.exists().then_some(default)
    })
}

fn main() -> Result<(), AppError> {
    let path = config_path();
    let loaded = match &path {
        Some(path) => ApplicationConfig::load_from_file(path),
        None => Ok(ApplicationConfig::default()),
    };

    // The log filter lives in the configuration, so logging starts after parsing
    let level = loaded.as_ref().map_or("info", |config| config.engine.log_level.as_str());
    logging::init_with_level(level);

    let config = match loaded.and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration {:?}: {}", path, e);
            return Err(e.into());
        }
    };
    match &path {
        Some(path) => log::info!("Configuration loaded from {:?}", path),
        None => log::info!("No configuration file, using defaults"),
    }

    log::info!("Starting drone viewer");
    let mut app = DroneApp::new(config).map_err(|e| {
        log::error!("Drone viewer failed to start: {}", e);
        e
    })?;
    app.run();
    log::info!("Drone viewer exited cleanly");
    Ok(())
}
