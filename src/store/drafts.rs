//! SqliteDraftStore: signup drafts persisted in the `drafts` table.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::OptionalExtension;
use tracing::debug;

use crate::config::DEFAULT_DRAFT_PREFIX;
use crate::error::DraftStoreError;

use super::db::Database;
use super::traits::DraftStore;

/// Durable draft storage backed by SQLite.
pub struct SqliteDraftStore {
    db: Arc<Database>,
    prefix: String,
}

impl SqliteDraftStore {
    /// Create a store over `db` using the default key prefix.
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_prefix(db, DEFAULT_DRAFT_PREFIX)
    }

    pub fn with_prefix(db: Arc<Database>, prefix: impl Into<String>) -> Self {
        Self {
            db,
            prefix: prefix.into(),
        }
    }
}

impl DraftStore for SqliteDraftStore {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn get(&self, key: &str) -> Result<Option<String>, DraftStoreError> {
        let conn = self.db.conn();
        conn.query_row(
            "SELECT value FROM drafts WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| DraftStoreError::Query(format!("get draft: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DraftStoreError> {
        let conn = self.db.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO drafts (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = ?2, updated_at = ?3",
            rusqlite::params![key, value, now],
        )
        .map_err(|e| DraftStoreError::Query(format!("set draft: {e}")))?;
        debug!(key = %key, "Draft row upserted");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, DraftStoreError> {
        let conn = self.db.conn();
        let count = conn
            .execute("DELETE FROM drafts WHERE key = ?1", rusqlite::params![key])
            .map_err(|e| DraftStoreError::Query(format!("delete draft: {e}")))?;
        Ok(count > 0)
    }
}
