// src/db/mod.rs

//! Database layer for Potluck
//!
//! All application state lives in a single SQLite file. This module opens
//! connections, creates the file on first use, and wraps multi-step writes
//! in transactions.

pub mod models;
pub mod paths;
pub mod schema;

mod migrations;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::info;

/// Create the database file (and its directory) and apply all migrations
pub fn init(db_path: impl AsRef<Path>) -> Result<()> {
    let db_path = db_path.as_ref();

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::InitError(format!(
                "Failed to create database directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    info!("Initializing database at {}", db_path.display());
    let conn = Connection::open(db_path)?;
    configure(&conn)?;
    schema::migrate(&conn)?;
    Ok(())
}

/// Open an existing database with foreign keys enforced
pub fn open(db_path: impl AsRef<Path>) -> Result<Connection> {
    let db_path = db_path.as_ref();
    if !db_path.exists() {
        return Err(Error::InitError(format!(
            "Database not found at {} (run `potluck init` first)",
            db_path.display()
        )));
    }

    let conn = Connection::open(db_path)?;
    configure(&conn)?;
    Ok(conn)
}

/// Run `f` inside a transaction, committing only if it returns `Ok`
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Per-connection settings
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested/dir/potluck.db");

        init(&db_path).unwrap();
        assert!(db_path.exists());

        let conn = open(&db_path).unwrap();
        let version = schema::get_schema_version(&conn).unwrap();
        assert_eq!(version, schema::SCHEMA_VERSION);
    }

    #[test]
    fn test_open_missing_database_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = open(temp_dir.path().join("missing.db"));
        assert!(matches!(result, Err(Error::InitError(_))));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("potluck.db");
        init(&db_path).unwrap();
        let mut conn = open(&db_path).unwrap();

        let result: Result<()> = transaction(&mut conn, |tx| {
            tx.execute("INSERT INTO cuisine_tags (name) VALUES ('Thai')", [])?;
            Err(Error::ParseError("abort".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM cuisine_tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
