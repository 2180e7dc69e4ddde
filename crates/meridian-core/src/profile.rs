//! User profile view over the `profiles` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A user profile.
///
/// The profile tracks identity fields, verification and role flags, and the
/// wallet balance. `id` is immutable after creation; `balance` is a ledger
/// value mutated only through explicit wallet and admin operations.
/// Non-negativity of the balance is intended but not enforced at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user id.
    pub id: UserId,

    /// Sign-in email address.
    #[serde(default)]
    pub email: String,

    /// Display name.
    #[serde(default)]
    pub full_name: String,

    /// Unique short handle, derived from the email when not supplied.
    #[serde(default)]
    pub username: String,

    /// Contact phone number.
    #[serde(default)]
    pub phone_number: String,

    /// Whether the user has access to the administrative surface.
    #[serde(default)]
    pub is_admin: bool,

    /// Whether the account is active/verified.
    #[serde(default)]
    pub is_verified: bool,

    /// Current wallet balance.
    #[serde(default)]
    pub balance: i64,

    /// Optional avatar URL.
    #[serde(default)]
    pub profile_picture_url: Option<String>,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new member profile with zero balance.
    #[must_use]
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        username: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            username: username.into(),
            phone_number: phone_number.into(),
            is_admin: false,
            is_verified: false,
            balance: 0,
            profile_picture_url: None,
            created_at: Utc::now(),
        }
    }

    /// Check whether the balance covers a deduction.
    #[must_use]
    pub fn has_sufficient_balance(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

/// Derive a username handle from an email address.
///
/// Takes the local part, lowercased, matching what registration does when no
/// explicit username is supplied.
#[must_use]
pub fn username_from_email(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or(email)
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_is_a_zero_balance_member() {
        let profile = UserProfile::new(
            UserId::generate(),
            "trader@example.com",
            "Trader",
            "trader",
            "0811111111",
        );
        assert_eq!(profile.balance, 0);
        assert!(!profile.is_admin);
        assert!(!profile.is_verified);
    }

    #[test]
    fn sufficient_balance_boundary() {
        let mut profile = UserProfile::new(
            UserId::generate(),
            "trader@example.com",
            "Trader",
            "trader",
            "0811111111",
        );
        profile.balance = 1000;

        assert!(profile.has_sufficient_balance(500));
        assert!(profile.has_sufficient_balance(1000));
        assert!(!profile.has_sufficient_balance(1001));
    }

    #[test]
    fn username_derivation() {
        assert_eq!(username_from_email("Trader@Example.com"), "trader");
        assert_eq!(username_from_email("no-at-sign"), "no-at-sign");
    }
}
