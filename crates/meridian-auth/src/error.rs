//! Authentication error types.

use meridian_core::{QueryError, StoreError};

/// Errors that can occur in authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The identifier/secret pair did not validate.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// An account with this identifier already exists.
    #[error("account already exists: {identifier}")]
    AlreadyExists {
        /// The identifier that was already taken.
        identifier: String,
    },

    /// A query against the table store failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The table store itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
