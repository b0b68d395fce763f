// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository trait for fleet persistence backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CarthubError;
use crate::types::{
    Cart, CartUpdate, HistoryEntry, HistoryReturn, NewCart, NewHistoryEntry, NewPerson,
    PersonUpdate, PersonWithCarts, ReturnRequest,
};

/// Persistence interface for carts, persons, and the usage-history ledger.
///
/// Every method returns an immutable snapshot of the affected resource;
/// callers re-fetch rather than mutate shared state. Multi-step mutations
/// (assign + history open, return + history close, bulk create) are atomic
/// within the backend.
#[async_trait]
pub trait FleetStore: Send + Sync {
    /// Initializes the backend (migrations, connection, pragmas).
    async fn initialize(&self) -> Result<(), CarthubError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), CarthubError>;

    // --- Carts ---

    async fn list_carts(&self) -> Result<Vec<Cart>, CarthubError>;
    async fn get_cart(&self, id: i64) -> Result<Cart, CarthubError>;
    async fn create_cart(&self, new: NewCart) -> Result<Cart, CarthubError>;
    async fn update_cart(&self, id: i64, update: CartUpdate) -> Result<Cart, CarthubError>;
    async fn delete_cart(&self, id: i64) -> Result<(), CarthubError>;
    /// Creates one cart per number in a single transaction; any duplicate
    /// fails the whole batch.
    async fn bulk_create_carts(&self, numbers: Vec<String>) -> Result<Vec<Cart>, CarthubError>;
    /// Deletes every cart (and, via cascade, assignments). Returns the count.
    async fn delete_all_carts(&self) -> Result<u64, CarthubError>;

    // --- Lifecycle ---

    /// Assigns a person, transitioning the cart into in-use if it is not
    /// already, and opens a history entry for the person.
    async fn assign_person(&self, cart_id: i64, person_id: i64) -> Result<Cart, CarthubError>;
    /// Unassigns a person, closing their open history entry. The cart
    /// reverts to available when the last assignee leaves.
    async fn unassign_person(&self, cart_id: i64, person_id: i64) -> Result<Cart, CarthubError>;
    /// The return flow: closes all open entries, records the final battery
    /// reading, and makes the cart available again.
    async fn return_cart(&self, cart_id: i64, req: ReturnRequest) -> Result<Cart, CarthubError>;
    /// Adjusts the expected return time of a checked-out cart.
    async fn update_return_time(
        &self,
        cart_id: i64,
        return_by: DateTime<Utc>,
    ) -> Result<Cart, CarthubError>;

    // --- Persons ---

    async fn list_persons(&self) -> Result<Vec<PersonWithCarts>, CarthubError>;
    async fn get_person(&self, id: i64) -> Result<PersonWithCarts, CarthubError>;
    async fn create_person(&self, new: NewPerson) -> Result<PersonWithCarts, CarthubError>;
    async fn update_person(
        &self,
        id: i64,
        update: PersonUpdate,
    ) -> Result<PersonWithCarts, CarthubError>;
    async fn delete_person(&self, id: i64) -> Result<(), CarthubError>;

    // --- History ledger ---

    async fn history_all(&self) -> Result<Vec<HistoryEntry>, CarthubError>;
    async fn history_for_cart(&self, cart_id: i64) -> Result<Vec<HistoryEntry>, CarthubError>;
    async fn history_for_person(&self, person_id: i64)
    -> Result<Vec<HistoryEntry>, CarthubError>;
    async fn create_history_entry(
        &self,
        new: NewHistoryEntry,
    ) -> Result<HistoryEntry, CarthubError>;
    /// Closes an entry exactly once; closing an already-closed entry is a
    /// conflict.
    async fn record_return(
        &self,
        entry_id: i64,
        ret: HistoryReturn,
    ) -> Result<HistoryEntry, CarthubError>;
}
