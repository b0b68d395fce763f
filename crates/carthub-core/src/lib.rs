// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Carthub fleet service.
//!
//! This crate provides the domain types, the shared error type, the
//! validation and lifecycle rules for carts and staff assignments, and the
//! `FleetStore` repository trait implemented by the storage backend.

pub mod error;
pub mod history;
pub mod lifecycle;
pub mod store;
pub mod types;
pub mod validate;

// Re-export key items at crate root for ergonomic imports.
pub use error::CarthubError;
pub use store::FleetStore;
pub use types::{Cart, CartStatus, HistoryEntry, Person, PersonWithCarts, Role};
