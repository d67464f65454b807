// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management: PRAGMA setup, migrations and the
//! one-time durability decision.
//!
//! All statements run on tokio-rusqlite's single background thread, so each
//! call completes before the next starts. Do NOT open a second Connection
//! for writes.

use std::path::Path;

use lumen_config::model::StorageConfig;
use lumen_core::{Authorizer, LumenError};
use tokio_rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::migrations;

/// Action string presented to the authorizer when opening durable memory.
pub const PERSIST_ACTION: &str = "open/create persistent memory";

/// Convert a tokio-rusqlite error into `LumenError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LumenError {
    LumenError::Storage {
        source: Box::new(e),
    }
}

/// Opening reports plain rusqlite errors, before the worker thread exists.
fn map_open_err(e: rusqlite::Error) -> LumenError {
    LumenError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the memory database, file-backed or volatile.
pub struct Database {
    conn: Connection,
    persistent: bool,
}

impl Database {
    /// Open (or create) a file-backed database and bring its schema up to date.
    pub async fn open(path: &Path, wal_mode: bool) -> Result<Self, LumenError> {
        let conn = Connection::open(path).await.map_err(map_open_err)?;
        prepare(&conn, wal_mode).await?;
        debug!(path = %path.display(), "opened persistent memory database");
        Ok(Self {
            conn,
            persistent: true,
        })
    }

    /// Open a volatile database that lives only as long as this handle.
    pub async fn open_in_memory() -> Result<Self, LumenError> {
        let conn = Connection::open_in_memory().await.map_err(map_open_err)?;
        prepare(&conn, false).await?;
        Ok(Self {
            conn,
            persistent: false,
        })
    }

    /// Decide durability once, by asking the authorizer.
    ///
    /// Denial, a missing data directory, or a file that cannot be opened all
    /// degrade to a volatile database without error. Only a failure to open
    /// the volatile fallback is reported.
    pub async fn open_authorized(
        config: &StorageConfig,
        authorizer: &dyn Authorizer,
    ) -> Result<Self, LumenError> {
        let path = config.database_path();
        let decision = authorizer
            .authorize(PERSIST_ACTION, &config.database_file, Some(&path))
            .await;

        if !decision.is_approved() {
            info!("persistent memory not authorized; using volatile memory for this session");
            return Self::open_in_memory().await;
        }

        if !Path::new(&config.data_dir).is_dir() {
            warn!(
                data_dir = config.data_dir.as_str(),
                "data directory unavailable; using volatile memory for this session"
            );
            return Self::open_in_memory().await;
        }

        match Self::open(&path, config.wal_mode).await {
            Ok(db) => Ok(db),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "cannot open memory database; using volatile memory");
                Self::open_in_memory().await
            }
        }
    }

    /// The underlying single-writer connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether data written through this handle survives a restart.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Checkpoint the WAL (file-backed only) before the handle is dropped.
    pub async fn checkpoint(&self) -> Result<(), LumenError> {
        if !self.persistent {
            return Ok(());
        }
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Apply connection PRAGMAs, then run pending migrations.
async fn prepare(conn: &Connection, wal_mode: bool) -> Result<(), LumenError> {
    conn.call(move |conn| -> Result<(), rusqlite::Error> {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        if wal_mode {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            debug!(journal_mode = mode.as_str(), "journal mode set");
        }
        Ok(())
    })
    .await
    .map_err(map_tr_err)?;

    conn.call(|conn| -> Result<(), LumenError> { migrations::run_migrations(conn) })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(inner) => inner,
            other => LumenError::Storage {
                source: other.to_string().into(),
            },
        })
}
