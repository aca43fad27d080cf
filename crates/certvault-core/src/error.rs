//! Error types for certvault core library.

use thiserror::Error;

/// Result type alias using certvault Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for certvault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Entity absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity with this identifier already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Authenticated actor lacks rights over the entity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credential check failed
    #[error("Incorrect user credentials")]
    Unauthenticated,

    /// Input cannot be parsed into the expected shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Creation path requires an owner but none was supplied
    #[error("Owner context required to create certificate")]
    MissingOwnerContext,

    /// Direct update attempted to change the owner
    #[error("Owner change attempted; must be done by transfer")]
    OwnerChangeRejected,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Password(String),
}
