// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use carthub_core::CarthubError;

/// Handle to the single SQLite connection.
///
/// Query modules accept `&Database` and run closures on the background
/// thread via [`Database::connection`]. Migrations run on open.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply pragmas, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, CarthubError> {
        Self::open_with_options(path, true).await
    }

    /// Open with an explicit WAL-mode choice.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, CarthubError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CarthubError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path.to_owned())
            .await
            .map_err(map_tr_err)?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            crate::migrations::run_migrations(conn).map_err(domain_err)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        tracing::debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), CarthubError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        tracing::debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Wrap a domain error so it can cross the tokio-rusqlite closure
/// boundary; [`map_tr_err`] unwraps it on the other side.
pub(crate) fn domain_err(err: CarthubError) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(err))
}

/// Translate a tokio-rusqlite error back into a `CarthubError`,
/// recovering domain errors smuggled through [`domain_err`].
pub fn map_tr_err(err: tokio_rusqlite::Error) -> CarthubError {
    match err {
        tokio_rusqlite::Error::Other(boxed) => match boxed.downcast::<CarthubError>() {
            Ok(domain) => *domain,
            Err(other) => CarthubError::Storage { source: other },
        },
        other => CarthubError::Storage {
            source: Box::new(other),
        },
    }
}
