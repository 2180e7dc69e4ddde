//! Client error types.

/// Errors that can occur when talking to the remote backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// A single-row request matched no rows.
    #[error("row not found")]
    RowNotFound,

    /// The identity provider rejected the credentials.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// An account with this identifier already exists.
    #[error("account already exists")]
    AlreadyExists,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
