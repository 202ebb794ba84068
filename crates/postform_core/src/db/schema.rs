//! Declared storage schema and its synchronizer.
//!
//! # Responsibility
//! - Declare the `author`, `category`, `post` tables and the
//!   `post_categories_category` junction table in one place.
//! - Reconcile an opened database with those declarations.
//!
//! # Invariants
//! - Synchronization is additive: tables and columns are created, never
//!   dropped or rewritten.
//! - Synchronization runs in one transaction; a conflict leaves the file
//!   untouched.
//! - Running synchronization on an up-to-date database changes nothing.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

pub const AUTHOR_TABLE: &str = "author";
pub const CATEGORY_TABLE: &str = "category";
pub const POST_TABLE: &str = "post";
pub const POST_CATEGORIES_TABLE: &str = "post_categories_category";

/// One declared column: name plus its SQLite type and constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub definition: &'static str,
}

impl ColumnSpec {
    /// Whether `ALTER TABLE ... ADD COLUMN` can introduce this column on a
    /// table that already holds rows.
    pub fn can_add_to_existing_table(&self) -> bool {
        let upper = self.definition.to_ascii_uppercase();
        if upper.contains("PRIMARY KEY") || upper.contains("UNIQUE") {
            return false;
        }
        !(upper.contains("NOT NULL") && !upper.contains("DEFAULT"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub columns: &'static str,
}

/// One declared table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    /// Table-level constraints appended after the column list.
    pub constraints: &'static [&'static str],
    pub indexes: &'static [IndexSpec],
}

impl TableSpec {
    fn create_sql(&self) -> String {
        let mut parts = self
            .columns
            .iter()
            .map(|column| format!("{} {}", column.name, column.definition))
            .collect::<Vec<_>>();
        parts.extend(self.constraints.iter().map(|c| (*c).to_string()));
        format!("CREATE TABLE {} (\n    {}\n);", self.name, parts.join(",\n    "))
    }
}

/// Declared schema, parents before children so foreign keys resolve.
pub const SCHEMA: &[TableSpec] = &[
    TableSpec {
        name: AUTHOR_TABLE,
        columns: &[
            ColumnSpec {
                name: "id",
                definition: "INTEGER PRIMARY KEY AUTOINCREMENT",
            },
            ColumnSpec {
                name: "name",
                definition: "TEXT NOT NULL DEFAULT ''",
            },
        ],
        constraints: &[],
        indexes: &[],
    },
    TableSpec {
        name: CATEGORY_TABLE,
        columns: &[
            ColumnSpec {
                name: "id",
                definition: "INTEGER PRIMARY KEY AUTOINCREMENT",
            },
            ColumnSpec {
                name: "name",
                definition: "TEXT NOT NULL DEFAULT ''",
            },
        ],
        constraints: &[],
        indexes: &[],
    },
    TableSpec {
        name: POST_TABLE,
        columns: &[
            ColumnSpec {
                name: "id",
                definition: "INTEGER PRIMARY KEY AUTOINCREMENT",
            },
            ColumnSpec {
                name: "title",
                definition: "TEXT NOT NULL DEFAULT ''",
            },
            ColumnSpec {
                name: "content",
                definition: "TEXT NOT NULL DEFAULT ''",
            },
            ColumnSpec {
                name: "author_id",
                definition: "INTEGER NOT NULL REFERENCES author(id)",
            },
        ],
        constraints: &[],
        indexes: &[IndexSpec {
            name: "idx_post_author_id",
            columns: "author_id",
        }],
    },
    TableSpec {
        name: POST_CATEGORIES_TABLE,
        columns: &[
            ColumnSpec {
                name: "post_id",
                definition: "INTEGER NOT NULL REFERENCES post(id) ON DELETE CASCADE",
            },
            ColumnSpec {
                name: "category_id",
                definition: "INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE",
            },
        ],
        constraints: &["PRIMARY KEY (post_id, category_id)"],
        indexes: &[IndexSpec {
            name: "idx_post_categories_category_category_id",
            columns: "category_id",
        }],
    },
];

/// What one synchronization pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub tables_created: Vec<&'static str>,
    /// `(table, column)` pairs added to pre-existing tables.
    pub columns_added: Vec<(&'static str, &'static str)>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.tables_created.is_empty() && self.columns_added.is_empty()
    }
}

/// Brings the connected database in line with [`SCHEMA`].
pub fn synchronize_schema(conn: &mut Connection) -> DbResult<SyncReport> {
    let tx = conn.transaction()?;
    let mut report = SyncReport::default();

    for table in SCHEMA {
        if table_exists(&tx, table.name)? {
            let existing = table_columns(&tx, table.name)?;
            for column in table.columns {
                if existing
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(column.name))
                {
                    continue;
                }
                if !column.can_add_to_existing_table() {
                    return Err(DbError::SchemaConflict {
                        table: table.name,
                        column: column.name,
                    });
                }
                tx.execute_batch(&format!(
                    "ALTER TABLE {} ADD COLUMN {} {};",
                    table.name, column.name, column.definition
                ))?;
                report.columns_added.push((table.name, column.name));
            }
        } else {
            tx.execute_batch(&table.create_sql())?;
            report.tables_created.push(table.name);
        }

        for index in table.indexes {
            tx.execute_batch(&format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({});",
                index.name, table.name, index.columns
            ))?;
        }
    }

    tx.commit()?;

    info!(
        "event=schema_sync module=db status=ok tables_created={} columns_added={}",
        report.tables_created.len(),
        report.columns_added.len()
    );
    Ok(report)
}

/// Returns whether a table with this exact name exists.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Lists column names of `table` in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
