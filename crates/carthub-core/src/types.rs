// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Carthub workspace.
//!
//! Wire names match the original admin UI contract: statuses are
//! kebab-case strings, timestamps serialize as RFC 3339 UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a cart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CartStatus {
    Available,
    InUse,
    Maintenance,
}

/// Staff role eligible for cart assignment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Volunteer,
}

/// A tracked cart, including its current assignees.
///
/// Invariant: `status == InUse` iff both timestamps are set and
/// `assigned_to` is non-empty. The storage layer maintains this on every
/// transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: i64,
    pub cart_number: String,
    pub status: CartStatus,
    pub battery_level: i64,
    pub checkout_time: Option<DateTime<Utc>>,
    pub return_by_time: Option<DateTime<Utc>>,
    /// Currently assigned persons, in assignment order.
    pub assigned_to: Vec<Person>,
}

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A person together with the derived view of their active carts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonWithCarts {
    #[serde(flatten)]
    pub person: Person,
    /// Read-only projection of carts currently assigned to this person.
    pub assigned_carts: Vec<Cart>,
}

/// One checkout-to-return cycle in the usage-history ledger.
///
/// Entries are append-only: checkout fields are immutable once created,
/// and the return fields are set exactly once when the entry closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub cart_id: i64,
    pub cart_number: String,
    pub person_id: i64,
    pub person_name: String,
    pub checkout_time: DateTime<Utc>,
    pub return_time: Option<DateTime<Utc>>,
    pub expected_return_time: DateTime<Utc>,
    pub battery_level_start: i64,
    pub battery_level_end: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// An entry is open until its return is recorded.
    pub fn is_open(&self) -> bool {
        self.return_time.is_none()
    }
}

// --- Mutation payloads (validated at the gateway boundary) ---

/// Fields for creating a cart.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCart {
    pub cart_number: String,
    #[serde(default = "default_battery_level")]
    pub battery_level: i64,
    #[serde(default = "default_status")]
    pub status: CartStatus,
}

fn default_battery_level() -> i64 {
    100
}

fn default_status() -> CartStatus {
    CartStatus::Available
}

/// Partial update of a cart. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartUpdate {
    #[serde(default)]
    pub cart_number: Option<String>,
    #[serde(default)]
    pub status: Option<CartStatus>,
    #[serde(default)]
    pub battery_level: Option<i64>,
}

/// Fields for creating a person.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Partial update of a person. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload for the return flow on a checked-out cart.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    /// Final battery reading, validated to [0, 100].
    pub battery_level: i64,
    #[serde(default)]
    pub notes: Option<String>,
    /// Actual return time; defaults to now when omitted.
    #[serde(default)]
    pub return_time: Option<DateTime<Utc>>,
}

/// Payload for opening a history entry directly.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHistoryEntry {
    pub cart_id: i64,
    pub person_id: i64,
    pub checkout_time: DateTime<Utc>,
    pub expected_return_time: DateTime<Utc>,
    pub battery_level_start: i64,
}

/// Payload for closing a history entry.
///
/// `battery_level_end` is required: a closed entry always carries its
/// final battery reading.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryReturn {
    #[serde(default)]
    pub return_time: Option<DateTime<Utc>>,
    pub battery_level_end: i64,
    #[serde(default)]
    pub notes: Option<String>,
}
