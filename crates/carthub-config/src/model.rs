// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Carthub fleet service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Carthub configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CarthubConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Checkout policy settings.
    #[serde(default)]
    pub fleet: FleetConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("carthub").join("carthub.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("carthub.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Checkout policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    /// Hours between checkout and the expected return applied at
    /// assignment time.
    #[serde(default = "default_checkout_window_hours")]
    pub checkout_window_hours: i64,

    /// Maximum number of staff assigned to one cart.
    #[serde(default = "default_assignment_cap")]
    pub assignment_cap: usize,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            checkout_window_hours: default_checkout_window_hours(),
            assignment_cap: default_assignment_cap(),
        }
    }
}

fn default_checkout_window_hours() -> i64 {
    6
}

fn default_assignment_cap() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_canonical_policy() {
        let config = CarthubConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.log_level, "info");
        assert!(config.storage.wal_mode);
        assert_eq!(config.fleet.checkout_window_hours, 6);
        assert_eq!(config.fleet.assignment_cap, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<CarthubConfig, _> =
            toml::from_str("[server]\nhost = \"0.0.0.0\"\nbogus = true\n");
        assert!(result.is_err());
    }
}
