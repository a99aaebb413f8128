use crate::errors::IchidanError;
use std::fmt::{self, Debug};
use turso::{Connection, Database};

pub mod sql;

/// A provider for interacting with a local SQLite database using Turso.
///
/// When cloned, it shares the same underlying database, allowing concurrent and
/// shared access to the same database file or in-memory instance.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// Use ":memory:" for an isolated in-memory database. To share it across
    /// handles (e.g. in tests), create one provider and `.clone()` it.
    pub async fn new(db_path: &str) -> Result<Self, IchidanError> {
        if db_path != ":memory:" {
            if let Some(parent) = std::path::Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        IchidanError::StorageConnection(format!(
                            "Failed to create database directory '{}': {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }

        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| IchidanError::StorageConnection(e.to_string()))?;

        // WAL has no effect on in-memory databases but is safe to run.
        let conn = db
            .connect()
            .map_err(|e| IchidanError::StorageConnection(e.to_string()))?;
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| IchidanError::StorageConnection(e.to_string()))?;

        Ok(Self { db })
    }

    /// Opens a new connection on the shared database.
    pub fn connect(&self) -> Result<Connection, IchidanError> {
        self.db
            .connect()
            .map_err(|e| IchidanError::StorageConnection(e.to_string()))
    }

    /// A helper for tests to pre-populate data by executing multiple SQL statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), IchidanError> {
        let conn = self.connect()?;
        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }

    /// Ensures that all required application tables and indexes exist.
    /// This function is idempotent and safe to call on every application startup.
    pub async fn initialize_schema(&self) -> Result<(), IchidanError> {
        let conn = self.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}
