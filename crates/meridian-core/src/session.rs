//! The marker of "currently signed-in identity" in a storage scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// The live session for a storage scope.
///
/// At most one session exists per scope at a time; it is created by a
/// successful sign-in and destroyed by sign-out. The session is not
/// validated against the table store after issuance (no expiry, no
/// revocation check beyond presence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in identity.
    pub user_id: UserId,

    /// The opaque credential issued at sign-in.
    pub access_token: String,

    /// When the session was issued.
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh session for `user_id` with a newly generated token.
    #[must_use]
    pub fn issue(user_id: UserId) -> Self {
        Self {
            user_id,
            access_token: format!("tok_{}", uuid::Uuid::new_v4().simple()),
            issued_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_sessions_have_distinct_tokens() {
        let user_id = UserId::generate();
        let a = Session::issue(user_id);
        let b = Session::issue(user_id);
        assert_ne!(a.access_token, b.access_token);
        assert!(a.access_token.starts_with("tok_"));
    }

    #[test]
    fn session_serde_roundtrip() {
        let session = Session::issue(UserId::generate());
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(session, parsed);
    }
}
