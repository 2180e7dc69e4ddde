//! Wire types for the remote backend APIs.

use serde::{Deserialize, Serialize};

/// The identity embedded in an auth session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserInfo {
    /// The user id.
    pub id: String,

    /// The registered email.
    pub email: String,
}

/// A bearer session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The bearer credential.
    pub access_token: String,

    /// Token type, normally `bearer`.
    #[serde(default)]
    pub token_type: String,

    /// The resolved identity.
    pub user: AuthUserInfo,
}

/// A freshly registered identity, before any profile row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIdentityResponse {
    /// The allocated user id.
    pub id: String,

    /// The registered email.
    pub email: String,
}

/// Credentials payload for sign-in and sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsRequest {
    /// Sign-in email.
    pub email: String,

    /// Secret.
    pub password: String,
}

/// Error body returned by the tabular and identity APIs.
///
/// The two APIs use different field names for the same idea, so every field
/// is optional and aliased.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Protocol error code (e.g. the row-not-found code).
    #[serde(default)]
    pub code: Option<String>,

    /// Identity-provider error slug (e.g. `invalid_grant`).
    #[serde(default)]
    pub error: Option<String>,

    /// Human-readable message.
    #[serde(default, alias = "msg", alias = "error_description")]
    pub message: Option<String>,
}
