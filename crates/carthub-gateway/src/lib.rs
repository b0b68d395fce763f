// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST API gateway for the carthub fleet service.
//!
//! Exposes cart, person, and usage-history endpoints over axum. Handlers
//! validate input at the boundary and delegate persistence to the
//! [`FleetStore`](carthub_core::FleetStore) trait, so the router can be
//! driven against any backend in tests.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{GatewayState, ServerConfig, build_router, start_server};
