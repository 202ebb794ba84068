//! SQLite storage bootstrap and schema synchronization entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the post form core.
//! - Own the single connection handed to a form session.
//! - Reconcile table structure with the declared schema on every open.
//!
//! # Invariants
//! - Core code must not read/write application data before schema
//!   synchronization succeeds.
//! - There is no migration version; the declared schema is the only source
//!   of truth for table shape.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod manager;
mod open;
pub mod schema;

pub use manager::{ConnectionManager, DbConfig, DbLocation, DEFAULT_DATABASE_NAME};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// An existing column cannot be reconciled with its declaration.
    SchemaConflict {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaConflict { table, column } => write!(
                f,
                "column `{table}.{column}` cannot be added to an existing table; declare it nullable or with a default"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaConflict { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
