// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects every violation instead of failing fast.

use crate::diagnostic::ConfigError;
use crate::model::CarthubConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &CarthubConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    if !["trace", "debug", "info", "warn", "error"]
        .contains(&config.server.log_level.as_str())
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not one of trace, debug, info, warn, error",
                config.server.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // The checkout window has to fit inside the 30-minute/24-hour bounds
    // enforced on user-supplied return times.
    if !(1..=24).contains(&config.fleet.checkout_window_hours) {
        errors.push(ConfigError::Validation {
            message: format!(
                "fleet.checkout_window_hours must be between 1 and 24, got {}",
                config.fleet.checkout_window_hours
            ),
        });
    }

    if !(1..=8).contains(&config.fleet.assignment_cap) {
        errors.push(ConfigError::Validation {
            message: format!(
                "fleet.assignment_cap must be between 1 and 8, got {}",
                config.fleet.assignment_cap
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn default_config_is_valid() {
        let config = CarthubConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_port_is_rejected() {
        let config = load_config_from_str("[server]\nport = 0\n").unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("server.port")));
    }

    #[test]
    fn out_of_range_window_is_rejected() {
        let config =
            load_config_from_str("[fleet]\ncheckout_window_hours = 48\n").unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("checkout_window_hours"));
    }

    #[test]
    fn multiple_violations_are_all_collected() {
        let config = load_config_from_str(
            "[server]\nhost = \"\"\nlog_level = \"loud\"\n\n[fleet]\nassignment_cap = 0\n",
        )
        .unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
