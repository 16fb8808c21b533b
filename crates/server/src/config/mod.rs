mod auth;
mod logging;
mod server;
mod store;

#[cfg(test)]
mod tests;

pub use auth::*;
pub use logging::*;
pub use server::*;
pub use store::*;

use std::path::Path;

use serde::Deserialize;

use crate::error::ServerError;

/// Top-level configuration for the fragments server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct FragmentsConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Basic auth users.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FragmentsConfig {
    /// Parse a configuration document.
    pub fn from_toml(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(format!("invalid config: {e}")))
    }

    /// Load the configuration at `path`, or all defaults if the file does not
    /// exist.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}
