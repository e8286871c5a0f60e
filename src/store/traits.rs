//! `DraftStore` trait: synchronous key-value persistence for signup drafts.

use tracing::{debug, warn};

use crate::error::DraftStoreError;
use crate::signup::model::{draft_key, ActorType, FormData};

/// Durable key-value slot for in-progress signups, one draft per actor type.
///
/// Implementors provide raw string get/set/delete; drafts are stored as
/// JSON under `<prefix>:<actor>`.
pub trait DraftStore: Send + Sync {
    /// Namespace prepended to every draft key.
    fn prefix(&self) -> &str;

    /// Raw value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, DraftStoreError>;

    /// Insert or replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), DraftStoreError>;

    /// Remove `key`. Returns whether anything was removed.
    fn delete(&self, key: &str) -> Result<bool, DraftStoreError>;

    /// Load the draft for `actor`.
    ///
    /// A value that doesn't parse as a form is treated as no draft.
    fn load(&self, actor: ActorType) -> Result<Option<FormData>, DraftStoreError> {
        let key = draft_key(self.prefix(), actor);
        let Some(raw) = self.get(&key)? else {
            return Ok(None);
        };
        match serde_json::from_str::<FormData>(&raw) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring malformed signup draft");
                Ok(None)
            }
        }
    }

    /// Replace the draft for `actor` with the full form.
    fn save(&self, actor: ActorType, data: &FormData) -> Result<(), DraftStoreError> {
        let key = draft_key(self.prefix(), actor);
        let raw = serde_json::to_string(data)?;
        self.set(&key, &raw)?;
        debug!(key = %key, "Signup draft saved");
        Ok(())
    }

    /// Remove the draft for `actor`.
    fn clear(&self, actor: ActorType) -> Result<bool, DraftStoreError> {
        let key = draft_key(self.prefix(), actor);
        let removed = self.delete(&key)?;
        debug!(key = %key, removed, "Signup draft cleared");
        Ok(removed)
    }
}
