//! Owned connection lifecycle for one form session.
//!
//! # Responsibility
//! - Describe where the database lives (`DbConfig`).
//! - Open the connection lazily on first use and memoize it.
//! - Close it explicitly when the owner shuts down.
//!
//! # Invariants
//! - At most one connection is held per manager.
//! - A failed open leaves the manager empty so the next call retries.

use super::open::{open_db, open_db_in_memory};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Database name used when the caller only supplies a directory.
pub const DEFAULT_DATABASE_NAME: &str = "expo";
const DATABASE_FILE_EXTENSION: &str = "sqlite3";

/// Storage location of the post database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private in-memory database; contents vanish on close.
    Memory,
}

/// Connection configuration handed to [`ConnectionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub location: DbLocation,
}

impl DbConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: DbLocation::File(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::Memory,
        }
    }

    /// Uses `<dir>/expo.sqlite3`.
    pub fn default_in(dir: impl AsRef<Path>) -> Self {
        Self::file(
            dir.as_ref()
                .join(format!("{DEFAULT_DATABASE_NAME}.{DATABASE_FILE_EXTENSION}")),
        )
    }

    /// Opens a fresh, schema-synchronized connection for this location.
    pub fn open(&self) -> DbResult<Connection> {
        match &self.location {
            DbLocation::File(path) => open_db(path),
            DbLocation::Memory => open_db_in_memory(),
        }
    }
}

/// Owner of the single database handle used by a session.
#[derive(Debug)]
pub struct ConnectionManager {
    config: DbConfig,
    conn: Option<Connection>,
}

impl ConnectionManager {
    /// Creates a manager that opens on first [`get_connection`](Self::get_connection).
    pub fn new(config: DbConfig) -> Self {
        Self { config, conn: None }
    }

    /// Creates a manager and opens its connection immediately.
    pub fn open(config: DbConfig) -> DbResult<Self> {
        let mut manager = Self::new(config);
        manager.get_connection()?;
        Ok(manager)
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Returns the memoized connection, opening it on first use.
    ///
    /// # Errors
    /// - Returns open/bootstrap failures unchanged; nothing is cached then.
    pub fn get_connection(&mut self) -> DbResult<&mut Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.config.open()?,
        };
        Ok(self.conn.insert(conn))
    }

    /// Closes the held connection, if any.
    pub fn close(mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_, err)) => {
                error!("event=db_close module=db status=error error={err}");
                Err(err.into())
            }
        }
    }
}
