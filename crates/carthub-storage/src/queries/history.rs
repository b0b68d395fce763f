// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The usage-history ledger.
//!
//! Entries denormalize the cart number and person name at checkout time,
//! so the ledger keeps its meaning after carts or persons are deleted.
//! An entry closes exactly once; re-closing is a conflict.

use carthub_core::CarthubError;
use carthub_core::types::{HistoryEntry, HistoryReturn, NewHistoryEntry};
use chrono::Utc;
use rusqlite::params;

use crate::database::{Database, domain_err, map_tr_err};
use crate::queries::{
    HISTORY_COLUMNS, history_from_row, read_cart, read_history_entry, read_person,
};

async fn list_where(
    db: &Database,
    filter_sql: &'static str,
    id: Option<i64>,
) -> Result<Vec<HistoryEntry>, CarthubError> {
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "SELECT {HISTORY_COLUMNS} FROM cart_history {filter_sql}
                 ORDER BY checkout_time DESC, id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let entries = match id {
                Some(id) => stmt
                    .query_map(params![id], history_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
                None => stmt
                    .query_map([], history_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
            };
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// Every ledger entry, most recent checkout first.
pub async fn all(db: &Database) -> Result<Vec<HistoryEntry>, CarthubError> {
    list_where(db, "", None).await
}

pub async fn for_cart(db: &Database, cart_id: i64) -> Result<Vec<HistoryEntry>, CarthubError> {
    list_where(db, "WHERE cart_id = ?1", Some(cart_id)).await
}

pub async fn for_person(db: &Database, person_id: i64) -> Result<Vec<HistoryEntry>, CarthubError> {
    list_where(db, "WHERE person_id = ?1", Some(person_id)).await
}

/// Open a ledger entry directly, outside the assign flow.
///
/// The cart and person must exist so their current number and name can be
/// captured. A person can hold at most one open entry per cart.
pub async fn create_entry(
    db: &Database,
    new: NewHistoryEntry,
) -> Result<HistoryEntry, CarthubError> {
    db.connection()
        .call(move |conn| {
            let cart = read_cart(conn, new.cart_id)?;
            let person = read_person(conn, new.person_id)?;

            let open_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM cart_history
                 WHERE cart_id = ?1 AND person_id = ?2 AND return_time IS NULL",
                params![new.cart_id, new.person_id],
                |row| row.get(0),
            )?;
            if open_count > 0 {
                return Err(domain_err(CarthubError::conflict(format!(
                    "Person '{}' already has an open entry for cart '{}'",
                    person.name, cart.cart_number
                ))));
            }

            conn.execute(
                "INSERT INTO cart_history
                     (cart_id, cart_number, person_id, person_name, checkout_time,
                      expected_return_time, battery_level_start, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    new.cart_id,
                    cart.cart_number,
                    new.person_id,
                    person.name,
                    new.checkout_time,
                    new.expected_return_time,
                    new.battery_level_start,
                    Utc::now()
                ],
            )?;
            read_history_entry(conn, conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Close an entry, recording its final battery reading and optional notes.
pub async fn record_return(
    db: &Database,
    entry_id: i64,
    ret: HistoryReturn,
) -> Result<HistoryEntry, CarthubError> {
    db.connection()
        .call(move |conn| {
            let entry = read_history_entry(conn, entry_id)?;
            if !entry.is_open() {
                return Err(domain_err(CarthubError::conflict(
                    "History entry is already closed",
                )));
            }
            let return_time = ret.return_time.unwrap_or_else(Utc::now);
            conn.execute(
                "UPDATE cart_history SET return_time = ?1, battery_level_end = ?2, notes = ?3
                 WHERE id = ?4",
                params![return_time, ret.battery_level_end, ret.notes, entry_id],
            )?;
            read_history_entry(conn, entry_id)
        })
        .await
        .map_err(map_tr_err)
}
