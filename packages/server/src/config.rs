//! Server configuration read from the environment.

use std::path::PathBuf;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default boundary dataset path.
pub const DEFAULT_BOUNDARIES_PATH: &str = "assets/india-states.json";

/// Startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Document database (`ARREST_MAP_DB`).
    pub db_path: PathBuf,
    /// State boundary `GeoJSON` (`ARREST_MAP_BOUNDARIES`).
    pub boundaries_path: PathBuf,
}

impl ServerConfig {
    /// Reads the configuration, falling back to defaults for anything unset
    /// or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT").and_then(|p| p.parse().ok());
        if port.is_none() && lookup("PORT").is_some() {
            log::warn!("Ignoring unparseable PORT, using {DEFAULT_PORT}");
        }

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port: port.unwrap_or(DEFAULT_PORT),
            db_path: lookup("ARREST_MAP_DB")
                .unwrap_or_else(|| arrest_map_store::DEFAULT_DB_PATH.to_string())
                .into(),
            boundaries_path: lookup("ARREST_MAP_BOUNDARIES")
                .unwrap_or_else(|| DEFAULT_BOUNDARIES_PATH.to_string())
                .into(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
