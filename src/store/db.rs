//! SQLite database handle: connection wrapper and migrations.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::info;

use crate::error::DraftStoreError;

/// Shared database handle wrapping a SQLite connection behind a Mutex.
///
/// Using `Mutex` (not `RwLock`) because rusqlite `Connection` is `!Sync`.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at the given path and run migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DraftStoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| DraftStoreError::Open(format!("{}: {e}", path.display())))?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        info!(path = %path.display(), "Draft database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self, DraftStoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DraftStoreError::Open(format!("in-memory: {e}")))?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get a lock on the underlying connection.
    ///
    /// Callers hold the lock for the duration of their DB operation.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run all schema migrations.
    fn run_migrations(&self) -> Result<(), DraftStoreError> {
        let conn = self.conn();

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS drafts (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )
        .map_err(|e| DraftStoreError::Query(format!("migrations: {e}")))?;

        info!("Draft database migrations complete");
        Ok(())
    }
}
