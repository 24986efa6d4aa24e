//! Error types for Lakeline

use thiserror::Error;

/// Result type alias for Lakeline operations
pub type Result<T> = std::result::Result<T, LakelineError>;

/// Main error type for Lakeline
#[derive(Error, Debug)]
pub enum LakelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid schema registry: {0}")]
    InvalidRegistry(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Provisioning failed for {resource}: {message}")]
    Provision { resource: String, message: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Query engine error: {0}")]
    Query(String),

    #[error("Schema discovery error: {0}")]
    Discovery(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LakelineError {
    /// Construct a provisioning error for a named remote resource.
    pub fn provision(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provision {
            resource: resource.into(),
            message: message.into(),
        }
    }
}
