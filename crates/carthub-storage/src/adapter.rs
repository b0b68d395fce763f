// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the FleetStore trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use carthub_config::model::{FleetConfig, StorageConfig};
use carthub_core::lifecycle::FleetPolicy;
use carthub_core::types::{
    Cart, CartUpdate, HistoryEntry, HistoryReturn, NewCart, NewHistoryEntry, NewPerson,
    PersonUpdate, PersonWithCarts, ReturnRequest,
};
use carthub_core::{CarthubError, FleetStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed fleet store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is lazily opened on the first call to
/// [`FleetStore::initialize`].
pub struct SqliteFleet {
    config: StorageConfig,
    policy: FleetPolicy,
    db: OnceCell<Database>,
}

impl SqliteFleet {
    /// Create a new SqliteFleet with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    pub fn new(config: StorageConfig, fleet: &FleetConfig) -> Self {
        Self {
            config,
            policy: FleetPolicy {
                checkout_window_hours: fleet.checkout_window_hours,
                assignment_cap: fleet.assignment_cap,
            },
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, CarthubError> {
        self.db.get().ok_or_else(|| CarthubError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl FleetStore for SqliteFleet {
    async fn initialize(&self) -> Result<(), CarthubError> {
        let db = Database::open_with_options(&self.config.database_path, self.config.wal_mode)
            .await?;
        self.db.set(db).map_err(|_| CarthubError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite fleet store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CarthubError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }

    // --- Carts ---

    async fn list_carts(&self) -> Result<Vec<Cart>, CarthubError> {
        queries::carts::list_carts(self.db()?).await
    }

    async fn get_cart(&self, id: i64) -> Result<Cart, CarthubError> {
        queries::carts::get_cart(self.db()?, id).await
    }

    async fn create_cart(&self, new: NewCart) -> Result<Cart, CarthubError> {
        queries::carts::create_cart(self.db()?, new).await
    }

    async fn update_cart(&self, id: i64, update: CartUpdate) -> Result<Cart, CarthubError> {
        queries::carts::update_cart(self.db()?, id, update).await
    }

    async fn delete_cart(&self, id: i64) -> Result<(), CarthubError> {
        queries::carts::delete_cart(self.db()?, id).await
    }

    async fn bulk_create_carts(&self, numbers: Vec<String>) -> Result<Vec<Cart>, CarthubError> {
        queries::carts::bulk_create(self.db()?, numbers).await
    }

    async fn delete_all_carts(&self) -> Result<u64, CarthubError> {
        queries::carts::delete_all(self.db()?).await
    }

    // --- Lifecycle ---

    async fn assign_person(&self, cart_id: i64, person_id: i64) -> Result<Cart, CarthubError> {
        queries::carts::assign_person(self.db()?, cart_id, person_id, self.policy).await
    }

    async fn unassign_person(&self, cart_id: i64, person_id: i64) -> Result<Cart, CarthubError> {
        queries::carts::unassign_person(self.db()?, cart_id, person_id).await
    }

    async fn return_cart(&self, cart_id: i64, req: ReturnRequest) -> Result<Cart, CarthubError> {
        queries::carts::return_cart(self.db()?, cart_id, req).await
    }

    async fn update_return_time(
        &self,
        cart_id: i64,
        return_by: DateTime<Utc>,
    ) -> Result<Cart, CarthubError> {
        queries::carts::update_return_time(self.db()?, cart_id, return_by).await
    }

    // --- Persons ---

    async fn list_persons(&self) -> Result<Vec<PersonWithCarts>, CarthubError> {
        queries::persons::list_persons(self.db()?).await
    }

    async fn get_person(&self, id: i64) -> Result<PersonWithCarts, CarthubError> {
        queries::persons::get_person(self.db()?, id).await
    }

    async fn create_person(&self, new: NewPerson) -> Result<PersonWithCarts, CarthubError> {
        queries::persons::create_person(self.db()?, new).await
    }

    async fn update_person(
        &self,
        id: i64,
        update: PersonUpdate,
    ) -> Result<PersonWithCarts, CarthubError> {
        queries::persons::update_person(self.db()?, id, update).await
    }

    async fn delete_person(&self, id: i64) -> Result<(), CarthubError> {
        queries::persons::delete_person(self.db()?, id).await
    }

    // --- History ledger ---

    async fn history_all(&self) -> Result<Vec<HistoryEntry>, CarthubError> {
        queries::history::all(self.db()?).await
    }

    async fn history_for_cart(&self, cart_id: i64) -> Result<Vec<HistoryEntry>, CarthubError> {
        queries::history::for_cart(self.db()?, cart_id).await
    }

    async fn history_for_person(
        &self,
        person_id: i64,
    ) -> Result<Vec<HistoryEntry>, CarthubError> {
        queries::history::for_person(self.db()?, person_id).await
    }

    async fn create_history_entry(
        &self,
        new: NewHistoryEntry,
    ) -> Result<HistoryEntry, CarthubError> {
        queries::history::create_entry(self.db()?, new).await
    }

    async fn record_return(
        &self,
        entry_id: i64,
        ret: HistoryReturn,
    ) -> Result<HistoryEntry, CarthubError> {
        queries::history::record_return(self.db()?, entry_id, ret).await
    }
}
