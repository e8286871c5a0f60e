//! Error types for the signup wizard.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Draft store error: {0}")]
    DraftStore(#[from] DraftStoreError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Draft persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    #[error("Failed to open draft store: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Misuse of the wizard controller.
///
/// Validation failures are not errors in this sense; they come back as
/// [`crate::signup::ValidationErrors`] from `next()`.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Signup session already submitted")]
    SessionCompleted,

    #[error("Field {field} expects a {expected} value")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown actor type: {0}")]
    UnknownActorType(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
