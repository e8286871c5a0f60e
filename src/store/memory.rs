//! In-memory draft store, for tests and embedding without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::config::DEFAULT_DRAFT_PREFIX;
use crate::error::DraftStoreError;

use super::traits::DraftStore;

/// Drafts kept in a mutex-guarded map of raw JSON strings.
pub struct MemoryDraftStore {
    prefix: String,
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_DRAFT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Poisoned locks are recovered; map operations never leave partial state.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStore for MemoryDraftStore {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn get(&self, key: &str) -> Result<Option<String>, DraftStoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DraftStoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, DraftStoreError> {
        Ok(self.entries().remove(key).is_some())
    }
}
