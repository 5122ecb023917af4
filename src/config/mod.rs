//! Configuration management for the web console
//!
//! Settings are layered from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use webconsole::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Console listening on: {}", config.server.bind_addr());
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `WEBCONSOLE__<section>__<key>`:
//! - `WEBCONSOLE__SERVER__PORT=28018`
//! - `WEBCONSOLE__SERVER__REST=true`
//! - `WEBCONSOLE__AUTH__REALM=ops`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/webconsole.toml`.
//! This can be overridden using the `WEBCONSOLE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{AdminUserConfig, AuthConfig, Config, LoggingConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Re-run validation, e.g. after command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)?;
        Ok(())
    }
}
