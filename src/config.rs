//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::signup::ActorType;

/// Default namespace for draft keys (`signup-draft:<actor>`).
pub const DEFAULT_DRAFT_PREFIX: &str = "signup-draft";

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Prefix used to build draft keys.
    pub draft_key_prefix: String,
    /// SQLite file holding drafts.
    pub db_path: PathBuf,
    /// Actor type to start with, if preselected.
    pub actor_type: Option<ActorType>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            draft_key_prefix: DEFAULT_DRAFT_PREFIX.to_string(),
            db_path: PathBuf::from("./data/signup-drafts.db"),
            actor_type: None,
        }
    }
}

impl WizardConfig {
    /// Build configuration from `SIGNUP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let draft_key_prefix = lookup("SIGNUP_DRAFT_PREFIX")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.draft_key_prefix);

        let db_path = lookup("SIGNUP_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let actor_type = match lookup("SIGNUP_ACTOR_TYPE") {
            Some(raw) => Some(raw.parse::<ActorType>().map_err(|_| ConfigError::InvalidValue {
                key: "SIGNUP_ACTOR_TYPE".to_string(),
                message: format!("expected client, agent or organization, got {raw:?}"),
            })?),
            None => None,
        };

        Ok(Self {
            draft_key_prefix,
            db_path,
            actor_type,
        })
    }
}
