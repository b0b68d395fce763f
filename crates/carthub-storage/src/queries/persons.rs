// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Person CRUD.
//!
//! Reads return `PersonWithCarts`, the person plus a projection of the
//! carts currently assigned to them. Deleting a person first unwinds
//! their assignments so cart state and the ledger stay consistent.

use carthub_core::CarthubError;
use carthub_core::lifecycle;
use carthub_core::types::{Cart, CartStatus, NewPerson, PersonUpdate, PersonWithCarts};
use chrono::Utc;
use rusqlite::params;

use crate::database::{Database, domain_err, map_tr_err};
use crate::queries::{PERSON_COLUMNS, cart_from_row, person_from_row, read_assignees, read_person};

/// Reject the name if another person already uses it.
fn ensure_name_free(
    conn: &rusqlite::Connection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<(), tokio_rusqlite::Error> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM persons WHERE name = ?1",
            params![name],
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
            "Person '{name}' already exists"
        ))));
    }
    Ok(())
}

/// Carts currently assigned to a person, each with its full assignee list.
fn read_assigned_carts(
    conn: &rusqlite::Connection,
    person_id: i64,
) -> Result<Vec<Cart>, tokio_rusqlite::Error> {
    let mut carts = Vec::new();
    {
        let mut stmt = conn.prepare(
            "SELECT c.id, c.cart_number, c.status, c.battery_level,
                    c.checkout_time, c.return_by_time
             FROM carts c
             JOIN cart_assignments a ON a.cart_id = c.id
             WHERE a.person_id = ?1
             ORDER BY c.id",
        )?;
        let rows = stmt.query_map(params![person_id], cart_from_row)?;
        for row in rows {
            carts.push(row?);
        }
    }
    for cart in &mut carts {
        cart.assigned_to = read_assignees(conn, cart.id)?;
    }
    Ok(carts)
}

fn read_person_with_carts(
    conn: &rusqlite::Connection,
    id: i64,
) -> Result<PersonWithCarts, tokio_rusqlite::Error> {
    let person = read_person(conn, id)?;
    let assigned_carts = read_assigned_carts(conn, id)?;
    Ok(PersonWithCarts {
        person,
        assigned_carts,
    })
}

pub async fn list_persons(db: &Database) -> Result<Vec<PersonWithCarts>, CarthubError> {
    db.connection()
        .call(|conn| {
            let mut persons = Vec::new();
            {
                let mut stmt =
                    conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY id"))?;
                let rows = stmt.query_map([], person_from_row)?;
                for row in rows {
                    persons.push(row?);
                }
            }
            let mut out = Vec::with_capacity(persons.len());
            for person in persons {
                let assigned_carts = read_assigned_carts(conn, person.id)?;
                out.push(PersonWithCarts {
                    person,
                    assigned_carts,
                });
            }
            Ok(out)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_person(db: &Database, id: i64) -> Result<PersonWithCarts, CarthubError> {
    db.connection()
        .call(move |conn| read_person_with_carts(conn, id))
        .await
        .map_err(map_tr_err)
}

pub async fn create_person(db: &Database, new: NewPerson) -> Result<PersonWithCarts, CarthubError> {
    db.connection()
        .call(move |conn| {
            ensure_name_free(conn, &new.name, None)?;
            conn.execute(
                "INSERT INTO persons (name, role, phone, email) VALUES (?1, ?2, ?3, ?4)",
                params![new.name, new.role.to_string(), new.phone, new.email],
            )?;
            let id = conn.last_insert_rowid();
            read_person_with_carts(conn, id)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update. An empty phone or email clears the field.
pub async fn update_person(
    db: &Database,
    id: i64,
    update: PersonUpdate,
) -> Result<PersonWithCarts, CarthubError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let person = read_person(&tx, id)?;

            if let Some(name) = &update.name
                && *name != person.name
            {
                ensure_name_free(&tx, name, Some(id))?;
                tx.execute(
                    "UPDATE persons SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )?;
            }
            if let Some(role) = update.role {
                tx.execute(
                    "UPDATE persons SET role = ?1 WHERE id = ?2",
                    params![role.to_string(), id],
                )?;
            }
            if let Some(phone) = &update.phone {
                let value = (!phone.is_empty()).then_some(phone.as_str());
                tx.execute(
                    "UPDATE persons SET phone = ?1 WHERE id = ?2",
                    params![value, id],
                )?;
            }
            if let Some(email) = &update.email {
                let value = (!email.is_empty()).then_some(email.as_str());
                tx.execute(
                    "UPDATE persons SET email = ?1 WHERE id = ?2",
                    params![value, id],
                )?;
            }

            let person = read_person_with_carts(&tx, id)?;
            tx.commit()?;
            Ok(person)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a person, unwinding their assignments first: each open history
/// entry closes at the cart's current battery, and a cart losing its last
/// assignee reverts to available.
pub async fn delete_person(db: &Database, id: i64) -> Result<(), CarthubError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            read_person(&tx, id)?;

            let cart_ids: Vec<i64> = {
                let mut stmt =
                    tx.prepare("SELECT cart_id FROM cart_assignments WHERE person_id = ?1")?;
                let rows = stmt.query_map(params![id], |row| row.get(0))?;
                rows.collect::<Result<_, _>>()?
            };

            let now = Utc::now();
            for cart_id in cart_ids {
                let battery: i64 = tx.query_row(
                    "SELECT battery_level FROM carts WHERE id = ?1",
                    params![cart_id],
                    |row| row.get(0),
                )?;
                tx.execute(
                    "UPDATE cart_history SET return_time = ?1, battery_level_end = ?2
                     WHERE cart_id = ?3 AND person_id = ?4 AND return_time IS NULL",
                    params![now, battery, cart_id, id],
                )?;
                tx.execute(
                    "DELETE FROM cart_assignments WHERE cart_id = ?1 AND person_id = ?2",
                    params![cart_id, id],
                )?;
                let remaining: usize = tx.query_row(
                    "SELECT COUNT(*) FROM cart_assignments WHERE cart_id = ?1",
                    params![cart_id],
                    |row| row.get(0),
                )?;
                if lifecycle::status_after_unassign(remaining) == CartStatus::Available {
                    tx.execute(
                        "UPDATE carts SET status = ?1, checkout_time = NULL,
                             return_by_time = NULL
                         WHERE id = ?2",
                        params![CartStatus::Available.to_string(), cart_id],
                    )?;
                }
            }

            tx.execute("DELETE FROM persons WHERE id = ?1", params![id])?;
            tx.commit()?;
            tracing::info!(person_id = id, "person deleted");
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use carthub_core::lifecycle::FleetPolicy;
    use carthub_core::types::{NewCart, Role};
    use tempfile::tempdir;

    use super::*;
    use crate::queries::{carts, history};

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn new_person(name: &str) -> NewPerson {
        NewPerson {
            name: name.to_string(),
            role: Role::Volunteer,
            phone: Some("+1 555-0100".into()),
            email: Some("ana@example.org".into()),
        }
    }

    #[tokio::test]
    async fn create_and_get_person_roundtrips() {
        let (db, _dir) = setup_db().await;
        let created = create_person(&db, new_person("Ana")).await.unwrap();
        assert_eq!(created.person.name, "Ana");
        assert_eq!(created.person.role, Role::Volunteer);
        assert!(created.assigned_carts.is_empty());

        let fetched = get_person(&db, created.person.id).await.unwrap();
        assert_eq!(fetched.person.email.as_deref(), Some("ana@example.org"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let (db, _dir) = setup_db().await;
        create_person(&db, new_person("Ana")).await.unwrap();
        let err = create_person(&db, new_person("Ana")).await.unwrap_err();
        assert!(matches!(err, CarthubError::Conflict(_)));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_person_is_not_found() {
        let (db, _dir) = setup_db().await;
        let err = get_person(&db, 42).await.unwrap_err();
        assert!(matches!(
            err,
            CarthubError::NotFound {
                resource: "person",
                id: 42
            }
        ));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_can_clear_contact_fields() {
        let (db, _dir) = setup_db().await;
        let created = create_person(&db, new_person("Ana")).await.unwrap();

        let updated = update_person(
            &db,
            created.person.id,
            PersonUpdate {
                phone: Some(String::new()),
                email: Some("new@example.org".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(updated.person.phone.is_none());
        assert_eq!(updated.person.email.as_deref(), Some("new@example.org"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn rename_to_existing_name_is_a_conflict() {
        let (db, _dir) = setup_db().await;
        create_person(&db, new_person("Ana")).await.unwrap();
        let ben = create_person(&db, new_person("Ben")).await.unwrap();

        let err = update_person(
            &db,
            ben.person.id,
            PersonUpdate {
                name: Some("Ana".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CarthubError::Conflict(_)));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn assigned_carts_projection_tracks_assignments() {
        let (db, _dir) = setup_db().await;
        let ana = create_person(&db, new_person("Ana")).await.unwrap();
        let cart = carts::create_cart(
            &db,
            NewCart {
                cart_number: "CART-001".into(),
                battery_level: 100,
                status: carthub_core::CartStatus::Available,
            },
        )
        .await
        .unwrap();

        carts::assign_person(&db, cart.id, ana.person.id, FleetPolicy::default())
            .await
            .unwrap();

        let fetched = get_person(&db, ana.person.id).await.unwrap();
        assert_eq!(fetched.assigned_carts.len(), 1);
        assert_eq!(fetched.assigned_carts[0].cart_number, "CART-001");
        assert_eq!(fetched.assigned_carts[0].assigned_to.len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_person_unwinds_assignments_and_reverts_cart() {
        let (db, _dir) = setup_db().await;
        let ana = create_person(&db, new_person("Ana")).await.unwrap();
        let cart = carts::create_cart(
            &db,
            NewCart {
                cart_number: "CART-001".into(),
                battery_level: 90,
                status: carthub_core::CartStatus::Available,
            },
        )
        .await
        .unwrap();
        carts::assign_person(&db, cart.id, ana.person.id, FleetPolicy::default())
            .await
            .unwrap();

        delete_person(&db, ana.person.id).await.unwrap();

        let cart = carts::get_cart(&db, cart.id).await.unwrap();
        assert_eq!(cart.status, carthub_core::CartStatus::Available);
        assert!(cart.checkout_time.is_none());
        assert!(cart.assigned_to.is_empty());

        // The ledger entry survives the deletion, closed at current battery.
        let entries = history::for_cart(&db, cart.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_open());
        assert_eq!(entries[0].battery_level_end, Some(90));
        assert_eq!(entries[0].person_name, "Ana");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_missing_person_is_not_found() {
        let (db, _dir) = setup_db().await;
        let err = delete_person(&db, 7).await.unwrap_err();
        assert!(matches!(err, CarthubError::NotFound { .. }));
        db.close().await.unwrap();
    }
}
