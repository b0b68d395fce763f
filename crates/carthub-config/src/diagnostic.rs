// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic error type for configuration problems.
//!
//! Figment errors and semantic validation failures are both rendered
//! through miette so startup failures read like compiler diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error suitable for terminal rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment failed to parse or merge the configuration sources.
    #[error("failed to load configuration: {message}")]
    #[diagnostic(
        code(carthub::config::load),
        help("check carthub.toml and CARTHUB_* environment variables for typos")
    )]
    Load {
        /// Figment's own description of the failure.
        message: String,
    },

    /// The configuration parsed but failed a semantic check.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(carthub::config::validation))]
    Validation {
        /// Which constraint was violated.
        message: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load {
            message: err.to_string(),
        }
    }
}

/// Print every collected error as a miette report to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figment_error_converts_to_load_variant() {
        let err = crate::loader::load_config_from_str("server = 1").unwrap_err();
        let converted: ConfigError = err.into();
        assert!(matches!(converted, ConfigError::Load { .. }));
    }

    #[test]
    fn validation_error_displays_its_message() {
        let err = ConfigError::Validation {
            message: "server.port must not be 0".into(),
        };
        assert!(err.to_string().contains("server.port"));
    }
}
