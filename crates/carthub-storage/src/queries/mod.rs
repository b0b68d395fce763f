// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD and lifecycle operations on fleet entities.
//!
//! Row-reading helpers live here; they take a plain `rusqlite::Connection`
//! so both single calls and multi-statement transactions can reuse them.

pub mod carts;
pub mod history;
pub mod persons;

use std::str::FromStr;

use carthub_core::CarthubError;
use carthub_core::types::{Cart, CartStatus, HistoryEntry, Person, Role};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::domain_err;

pub(crate) const CART_COLUMNS: &str =
    "id, cart_number, status, battery_level, checkout_time, return_by_time";

pub(crate) const PERSON_COLUMNS: &str = "id, name, role, phone, email";

pub(crate) const HISTORY_COLUMNS: &str =
    "id, cart_id, cart_number, person_id, person_name, checkout_time, return_time,
     expected_return_time, battery_level_start, battery_level_end, notes, created_at";

/// Parse a stored enum column, surfacing corruption as a conversion error.
fn parse_column<T: FromStr>(idx: usize, raw: &str) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(e),
    ))
}

pub(crate) fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
    let raw_role: String = row.get(2)?;
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        role: parse_column::<Role>(2, &raw_role)?,
        phone: row.get(3)?,
        email: row.get(4)?,
    })
}

/// Maps a cart row; assignees are attached separately.
pub(crate) fn cart_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Cart> {
    let raw_status: String = row.get(2)?;
    Ok(Cart {
        id: row.get(0)?,
        cart_number: row.get(1)?,
        status: parse_column::<CartStatus>(2, &raw_status)?,
        battery_level: row.get(3)?,
        checkout_time: row.get(4)?,
        return_by_time: row.get(5)?,
        assigned_to: Vec::new(),
    })
}

pub(crate) fn history_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        cart_id: row.get(1)?,
        cart_number: row.get(2)?,
        person_id: row.get(3)?,
        person_name: row.get(4)?,
        checkout_time: row.get(5)?,
        return_time: row.get(6)?,
        expected_return_time: row.get(7)?,
        battery_level_start: row.get(8)?,
        battery_level_end: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Read one person or fail with `NotFound`.
pub(crate) fn read_person(
    conn: &rusqlite::Connection,
    id: i64,
) -> Result<Person, tokio_rusqlite::Error> {
    let result = conn.query_row(
        &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
        params![id],
        person_from_row,
    );
    match result {
        Ok(person) => Ok(person),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(domain_err(CarthubError::NotFound {
            resource: "person",
            id,
        })),
        Err(e) => Err(e.into()),
    }
}

/// Current assignees of a cart, in assignment order.
pub(crate) fn read_assignees(
    conn: &rusqlite::Connection,
    cart_id: i64,
) -> Result<Vec<Person>, tokio_rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, p.role, p.phone, p.email FROM persons p
         JOIN cart_assignments a ON a.person_id = p.id
         WHERE a.cart_id = ?1
         ORDER BY a.assigned_at, p.id",
    )?;
    let rows = stmt.query_map(params![cart_id], person_from_row)?;
    let mut persons = Vec::new();
    for row in rows {
        persons.push(row?);
    }
    Ok(persons)
}

/// Read one cart (with assignees) or fail with `NotFound`.
pub(crate) fn read_cart(
    conn: &rusqlite::Connection,
    id: i64,
) -> Result<Cart, tokio_rusqlite::Error> {
    let result = conn.query_row(
        &format!("SELECT {CART_COLUMNS} FROM carts WHERE id = ?1"),
        params![id],
        cart_from_row,
    );
    match result {
        Ok(mut cart) => {
            cart.assigned_to = read_assignees(conn, id)?;
            Ok(cart)
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(domain_err(CarthubError::NotFound {
            resource: "cart",
            id,
        })),
        Err(e) => Err(e.into()),
    }
}

/// Read one history entry or fail with `NotFound`.
pub(crate) fn read_history_entry(
    conn: &rusqlite::Connection,
    id: i64,
) -> Result<HistoryEntry, tokio_rusqlite::Error> {
    let result = conn.query_row(
        &format!("SELECT {HISTORY_COLUMNS} FROM cart_history WHERE id = ?1"),
        params![id],
        history_from_row,
    );
    match result {
        Ok(entry) => Ok(entry),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(domain_err(CarthubError::NotFound {
            resource: "history entry",
            id,
        })),
        Err(e) => Err(e.into()),
    }
}
