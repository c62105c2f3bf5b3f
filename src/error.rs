//! Crate-level error types.
//!
//! Per-item failures never surface as `Err` to the batch loop; they are folded
//! into a [`crate::ProcessingStatus`]. The types here cover collaborator
//! failures (store, decryption) and startup problems (configuration, key
//! setup, the listener).

use thiserror::Error;

/// Result alias for configuration and bootstrap.
pub type Result<T> = std::result::Result<T, Error>;

/// Startup and configuration errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is missing or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The decryption provider could not be constructed.
    #[error("decryptor setup failed: {0}")]
    Decryptor(#[from] DecryptError),

    /// The listener could not be bound or the server stopped with an error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors returned by store collaborators.
///
/// A conditional-check rejection is *not* an error; it is reported as
/// [`crate::store::PutOutcome::Conflict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the request.
    #[error("{0}")]
    Backend(String),

    /// The backend answered with data that does not map to a record.
    #[error("malformed item: {0}")]
    Malformed(String),
}

/// Errors returned by a [`crate::reference::Decryptor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptError {
    /// The token is not valid base64.
    #[error("token is not valid base64: {0}")]
    Encoding(String),

    /// Authentication or decryption failed, or the token is too short.
    #[error("decryption failed")]
    Crypto,

    /// The plaintext is not UTF-8.
    #[error("plaintext is not valid UTF-8")]
    Utf8,

    /// The configured key is unusable.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl From<base64::DecodeError> for DecryptError {
    fn from(err: base64::DecodeError) -> Self {
        DecryptError::Encoding(err.to_string())
    }
}
