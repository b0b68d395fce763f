// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Carthub fleet service.

use thiserror::Error;

/// The primary error type used across all Carthub crates.
///
/// Variants are cut along the wire contract: `Validation` maps to 400,
/// `NotFound` to 404, `Conflict` to 409, everything else to 500. The
/// message text is what reaches the client, so duplicate-key conflicts
/// keep the "already exists" phrasing the admin UI pattern-matches on.
#[derive(Debug, Error)]
pub enum CarthubError {
    /// Configuration errors (invalid TOML, missing fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A request payload failed a field or cross-field validation rule.
    #[error("{0}")]
    Validation(String),

    /// The addressed resource does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// The request conflicts with current state (duplicate key, lifecycle
    /// guard, assignment cap).
    #[error("{0}")]
    Conflict(String),

    /// Storage backend errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CarthubError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a state conflict.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
