// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cart CRUD and lifecycle operations.
//!
//! Assign, unassign, return, and bulk create each run inside one
//! transaction so the cart row, the assignment table, and the history
//! ledger can never drift apart.

use carthub_core::CarthubError;
use carthub_core::lifecycle::{self, FleetPolicy};
use carthub_core::types::{Cart, CartStatus, CartUpdate, NewCart, ReturnRequest};
use carthub_core::validate;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::{Database, domain_err, map_tr_err};
use crate::queries::{CART_COLUMNS, cart_from_row, read_assignees, read_cart, read_person};

/// Reject the number if another cart already uses it.
fn ensure_cart_number_free(
    conn: &rusqlite::Connection,
    number: &str,
    exclude_id: Option<i64>,
) -> Result<(), tokio_rusqlite::Error> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM carts WHERE cart_number = ?1",
            params![number],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;
    if let Some(id) = existing
        && Some(id) != exclude_id
    {
        return Err(domain_err(CarthubError::conflict(format!(
            "Cart number '{number}' already exists"
        ))));
    }
    Ok(())
}

/// List every cart with its assignees, in creation order.
pub async fn list_carts(db: &Database) -> Result<Vec<Cart>, CarthubError> {
    db.connection()
        .call(|conn| {
            let mut carts = Vec::new();
            {
                let mut stmt =
                    conn.prepare(&format!("SELECT {CART_COLUMNS} FROM carts ORDER BY id"))?;
                let rows = stmt.query_map([], cart_from_row)?;
                for row in rows {
                    carts.push(row?);
                }
            }
            for cart in &mut carts {
                cart.assigned_to = read_assignees(conn, cart.id)?;
            }
            Ok(carts)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a cart by ID.
pub async fn get_cart(db: &Database, id: i64) -> Result<Cart, CarthubError> {
    db.connection()
        .call(move |conn| read_cart(conn, id))
        .await
        .map_err(map_tr_err)
}

/// Create a new cart. Creating one directly as in-use is rejected since
/// it would have no assignee.
pub async fn create_cart(db: &Database, new: NewCart) -> Result<Cart, CarthubError> {
    db.connection()
        .call(move |conn| {
            lifecycle::check_status_edit(new.status, 0).map_err(domain_err)?;
            ensure_cart_number_free(conn, &new.cart_number, None)?;
            conn.execute(
                "INSERT INTO carts (cart_number, status, battery_level) VALUES (?1, ?2, ?3)",
                params![new.cart_number, new.status.to_string(), new.battery_level],
            )?;
            let id = conn.last_insert_rowid();
            read_cart(conn, id)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update.
///
/// An edit that takes the cart out of in-use without the return flow still
/// clears the timestamps and assignments, and closes any open history
/// entries at the cart's current battery so the ledger stays consistent.
pub async fn update_cart(db: &Database, id: i64, update: CartUpdate) -> Result<Cart, CarthubError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let cart = read_cart(&tx, id)?;

            if let Some(number) = &update.cart_number
                && *number != cart.cart_number
            {
                ensure_cart_number_free(&tx, number, Some(id))?;
                tx.execute(
                    "UPDATE carts SET cart_number = ?1 WHERE id = ?2",
                    params![number, id],
                )?;
            }

            if let Some(level) = update.battery_level {
                tx.execute(
                    "UPDATE carts SET battery_level = ?1 WHERE id = ?2",
                    params![level, id],
                )?;
            }

            if let Some(status) = update.status
                && status != cart.status
            {
                lifecycle::check_status_edit(status, cart.assigned_to.len())
                    .map_err(domain_err)?;
                tx.execute(
                    "UPDATE carts SET status = ?1 WHERE id = ?2",
                    params![status.to_string(), id],
                )?;
                if cart.status == CartStatus::InUse {
                    // Leaving in-use outside the return flow.
                    let now = Utc::now();
                    let battery = update.battery_level.unwrap_or(cart.battery_level);
                    tx.execute(
                        "UPDATE cart_history SET return_time = ?1, battery_level_end = ?2
                         WHERE cart_id = ?3 AND return_time IS NULL",
                        params![now, battery, id],
                    )?;
                    tx.execute(
                        "UPDATE carts SET checkout_time = NULL, return_by_time = NULL
                         WHERE id = ?1",
                        params![id],
                    )?;
                    tx.execute(
                        "DELETE FROM cart_assignments WHERE cart_id = ?1",
                        params![id],
                    )?;
                    tracing::debug!(cart_id = id, new_status = %status, "cart left in-use via direct edit");
                }
            }

            let cart = read_cart(&tx, id)?;
            tx.commit()?;
            Ok(cart)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a cart.
pub async fn delete_cart(db: &Database, id: i64) -> Result<(), CarthubError> {
    db.connection()
        .call(move |conn| {
            let rows = conn.execute("DELETE FROM carts WHERE id = ?1", params![id])?;
            if rows == 0 {
                return Err(domain_err(CarthubError::NotFound {
                    resource: "cart",
                    id,
                }));
            }
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Create one cart per number inside a single transaction. Any duplicate
/// rolls the whole batch back.
pub async fn bulk_create(db: &Database, numbers: Vec<String>) -> Result<Vec<Cart>, CarthubError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut ids = Vec::with_capacity(numbers.len());
            for number in &numbers {
                ensure_cart_number_free(&tx, number, None)?;
                tx.execute(
                    "INSERT INTO carts (cart_number) VALUES (?1)",
                    params![number],
                )?;
                ids.push(tx.last_insert_rowid());
            }
            let carts = ids
                .iter()
                .map(|id| read_cart(&tx, *id))
                .collect::<Result<Vec<_>, _>>()?;
            tx.commit()?;
            Ok(carts)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every cart. Assignments go with them via cascade; the history
/// ledger is deliberately left intact.
pub async fn delete_all(db: &Database) -> Result<u64, CarthubError> {
    db.connection()
        .call(|conn| {
            let rows = conn.execute("DELETE FROM carts", [])?;
            Ok(rows as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Assign a person to a cart.
///
/// Transitions the cart into in-use (with the policy's checkout window) if
/// it is not already, and opens a history entry capturing the starting
/// battery level. One transaction covers the cart row, the assignment, and
/// the ledger entry.
pub async fn assign_person(
    db: &Database,
    cart_id: i64,
    person_id: i64,
    policy: FleetPolicy,
) -> Result<Cart, CarthubError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let cart = read_cart(&tx, cart_id)?;
            let person = read_person(&tx, person_id)?;

            let assignee_ids: Vec<i64> = cart.assigned_to.iter().map(|p| p.id).collect();
            lifecycle::check_assign(&assignee_ids, person_id, &policy).map_err(domain_err)?;

            let now = Utc::now();
            let (checkout, return_by) = if cart.status == CartStatus::InUse {
                // Joining an active checkout: share its window.
                (
                    cart.checkout_time.unwrap_or(now),
                    cart.return_by_time.unwrap_or(now),
                )
            } else {
                let (checkout, return_by) = lifecycle::checkout_window(now, &policy);
                tx.execute(
                    "UPDATE carts SET status = ?1, checkout_time = ?2, return_by_time = ?3
                     WHERE id = ?4",
                    params![
                        CartStatus::InUse.to_string(),
                        checkout,
                        return_by,
                        cart_id
                    ],
                )?;
                (checkout, return_by)
            };

            tx.execute(
                "INSERT INTO cart_assignments (cart_id, person_id, assigned_at)
                 VALUES (?1, ?2, ?3)",
                params![cart_id, person_id, now],
            )?;
            tx.execute(
                "INSERT INTO cart_history
                     (cart_id, cart_number, person_id, person_name, checkout_time,
                      expected_return_time, battery_level_start, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    cart_id,
                    cart.cart_number,
                    person_id,
                    person.name,
                    checkout,
                    return_by,
                    cart.battery_level,
                    now
                ],
            )?;

            let cart = read_cart(&tx, cart_id)?;
            tx.commit()?;
            tracing::info!(cart_id, person_id, "person assigned to cart");
            Ok(cart)
        })
        .await
        .map_err(map_tr_err)
}

/// Unassign a person from a cart, closing their open history entry at the
/// cart's current battery level. Unassigning the last person reverts the
/// cart to available and clears its timestamps.
pub async fn unassign_person(
    db: &Database,
    cart_id: i64,
    person_id: i64,
) -> Result<Cart, CarthubError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let cart = read_cart(&tx, cart_id)?;

            let assignee_ids: Vec<i64> = cart.assigned_to.iter().map(|p| p.id).collect();
            lifecycle::check_unassign(&assignee_ids, person_id).map_err(domain_err)?;

            let now = Utc::now();
            tx.execute(
                "UPDATE cart_history SET return_time = ?1, battery_level_end = ?2
                 WHERE cart_id = ?3 AND person_id = ?4 AND return_time IS NULL",
                params![now, cart.battery_level, cart_id, person_id],
            )?;
            tx.execute(
                "DELETE FROM cart_assignments WHERE cart_id = ?1 AND person_id = ?2",
                params![cart_id, person_id],
            )?;

            let remaining = assignee_ids.len() - 1;
            if lifecycle::status_after_unassign(remaining) == CartStatus::Available {
                tx.execute(
                    "UPDATE carts SET status = ?1, checkout_time = NULL, return_by_time = NULL
                     WHERE id = ?2",
                    params![CartStatus::Available.to_string(), cart_id],
                )?;
            }

            let cart = read_cart(&tx, cart_id)?;
            tx.commit()?;
            tracing::info!(cart_id, person_id, remaining, "person unassigned from cart");
            Ok(cart)
        })
        .await
        .map_err(map_tr_err)
}

/// The return flow: close all open history entries with the submitted
/// battery reading and optional notes, then make the cart available again.
pub async fn return_cart(
    db: &Database,
    cart_id: i64,
    req: ReturnRequest,
) -> Result<Cart, CarthubError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let cart = read_cart(&tx, cart_id)?;
            lifecycle::check_return(cart.status).map_err(domain_err)?;

            let now = req.return_time.unwrap_or_else(Utc::now);
            tx.execute(
                "UPDATE cart_history SET return_time = ?1, battery_level_end = ?2, notes = ?3
                 WHERE cart_id = ?4 AND return_time IS NULL",
                params![now, req.battery_level, req.notes, cart_id],
            )?;
            tx.execute(
                "UPDATE carts SET status = ?1, battery_level = ?2,
                     checkout_time = NULL, return_by_time = NULL
                 WHERE id = ?3",
                params![
                    CartStatus::Available.to_string(),
                    req.battery_level,
                    cart_id
                ],
            )?;
            tx.execute(
                "DELETE FROM cart_assignments WHERE cart_id = ?1",
                params![cart_id],
            )?;

            let cart = read_cart(&tx, cart_id)?;
            tx.commit()?;
            tracing::info!(cart_id, battery = req.battery_level, "cart returned");
            Ok(cart)
        })
        .await
        .map_err(map_tr_err)
}

/// Adjust the expected return time of a checked-out cart, keeping it
/// within the allowed window of its checkout time.
pub async fn update_return_time(
    db: &Database,
    cart_id: i64,
    return_by: DateTime<Utc>,
) -> Result<Cart, CarthubError> {
    db.connection()
        .call(move |conn| {
            let cart = read_cart(conn, cart_id)?;
            let checkout = cart
                .checkout_time
                .ok_or_else(|| domain_err(CarthubError::conflict("Cart is not checked out")))?;
            validate::validate_return_window(checkout, return_by).map_err(domain_err)?;
            conn.execute(
                "UPDATE carts SET return_by_time = ?1 WHERE id = ?2",
                params![return_by, cart_id],
            )?;
            read_cart(conn, cart_id)
        })
        .await
        .map_err(map_tr_err)
}
