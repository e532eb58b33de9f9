use thiserror::Error;

/// Failure at the persistence boundary. Callers of the silent cache API never
/// see these; they are logged and replaced by a fallback.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage medium failed: {0}")]
    Medium(#[from] rusqlite::Error),

    #[error("storage medium unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt payload under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A publish form that is missing required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("complete the required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no application for listing '{0}'")]
    UnknownApplication(String),

    #[error("no credential with id '{0}'")]
    UnknownCredential(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
