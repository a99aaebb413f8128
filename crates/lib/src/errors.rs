use thiserror::Error;

/// Custom error types for the library.
#[derive(Error, Debug)]
pub enum IchidanError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("Identity provider rejected the token: {0}")]
    Identity(String),
    #[error("Storage connection error: {0}")]
    StorageConnection(String),
    #[error("Storage operation failed: {0}")]
    StorageOperationFailed(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl From<turso::Error> for IchidanError {
    fn from(err: turso::Error) -> Self {
        IchidanError::StorageOperationFailed(err.to_string())
    }
}

impl IchidanError {
    /// Shorthand for a validation failure with a user-facing message.
    pub fn validation(msg: impl Into<String>) -> Self {
        IchidanError::Validation(msg.into())
    }

    /// Shorthand for a missing entity, e.g. `not_found("Record 3")`.
    pub fn not_found(what: impl Into<String>) -> Self {
        IchidanError::NotFound(what.into())
    }
}
