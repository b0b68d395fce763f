// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./carthub.toml` > `~/.config/carthub/carthub.toml`
//! > `/etc/carthub/carthub.toml` with environment variable overrides via the
//! `CARTHUB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CarthubConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/carthub/carthub.toml` (system-wide)
/// 3. `~/.config/carthub/carthub.toml` (user XDG config)
/// 4. `./carthub.toml` (local directory)
/// 5. `CARTHUB_*` environment variables
pub fn load_config() -> Result<CarthubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CarthubConfig::default()))
        .merge(Toml::file("/etc/carthub/carthub.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("carthub/carthub.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("carthub.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CarthubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CarthubConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CarthubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CarthubConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` so underscore-containing key
/// names stay unambiguous: `CARTHUB_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("CARTHUB_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("fleet_", "fleet.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.fleet.checkout_window_hours, 6);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [fleet]
            checkout_window_hours = 4
            assignment_cap = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.fleet.checkout_window_hours, 4);
        assert_eq!(config.fleet.assignment_cap, 3);
        // Untouched sections keep their defaults.
        assert!(config.storage.wal_mode);
    }

    #[test]
    fn unknown_section_is_an_error() {
        assert!(load_config_from_str("[gateway]\nport = 1\n").is_err());
    }
}
