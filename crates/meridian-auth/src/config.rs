//! Authentication configuration.
//!
//! Credential rules live here rather than in comparison logic: specific
//! accounts can carry a fixed secret, every other known account falls under
//! the mock-permissive rule (any non-empty secret), and the break-glass
//! identity is an explicit, clearly-flagged configuration entry instead of a
//! literal buried in the sign-in path.

use std::collections::HashMap;

use uuid::uuid;

use meridian_core::{UserId, UserProfile};

/// The break-glass identity's fixed user id. Not present in any table.
pub const BREAK_GLASS_USER_ID: UserId =
    UserId::from_uuid(uuid!("b5d8f3e6-0a7c-4391-825e-6f4b2d9a7c95"));

/// A break-glass identity: a bypass identifier/secret pair granting
/// administrator rights without any backing profile record.
///
/// Every use is logged at `warn` level. Remove the entry from the config to
/// disable the path entirely.
#[derive(Debug, Clone)]
pub struct BreakGlass {
    /// Identifiers that activate the bypass (handle and email forms).
    pub identifiers: Vec<String>,

    /// The bypass secret.
    pub secret: String,

    /// The administrator profile materialized for the bypass identity.
    pub profile: UserProfile,
}

impl BreakGlass {
    /// Whether the identifier/secret pair activates this bypass.
    #[must_use]
    pub fn matches(&self, identifier: &str, secret: &str) -> bool {
        self.secret == secret && self.identifiers.iter().any(|i| i == identifier)
    }
}

/// Credential rules for the authentication simulator.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Accounts whose secret is a fixed literal, keyed by identifier.
    /// Accounts not listed here fall under the mock-permissive rule: any
    /// non-empty secret validates.
    pub fixed_credentials: HashMap<String, String>,

    /// The break-glass identity, if enabled.
    pub break_glass: Option<BreakGlass>,
}

impl AuthConfig {
    /// A config with no fixed credentials and no break-glass identity:
    /// every known account falls under the permissive rule.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            fixed_credentials: HashMap::new(),
            break_glass: None,
        }
    }

    /// The fixed secret configured for `identifier`, if any.
    #[must_use]
    pub fn fixed_secret(&self, identifier: &str) -> Option<&str> {
        self.fixed_credentials.get(identifier).map(String::as_str)
    }
}

impl Default for AuthConfig {
    /// The stock configuration: fixed literals for the seed accounts plus
    /// the break-glass administrator.
    fn default() -> Self {
        let fixed_credentials = [
            ("panggilajabryan@gmail.com", "admin"),
            ("amboali89@gmail.com", "password123"),
            ("member@gmail.com", "member123"),
            ("test@member.com", "123456"),
        ]
        .into_iter()
        .map(|(identifier, secret)| (identifier.to_string(), secret.to_string()))
        .collect();

        let mut profile = UserProfile::new(
            BREAK_GLASS_USER_ID,
            "admin@vip4.com",
            "Super Administrator",
            "peluncur257",
            "08123456789",
        );
        profile.is_admin = true;
        profile.is_verified = true;
        profile.balance = 9_999_999_999;

        Self {
            fixed_credentials,
            break_glass: Some(BreakGlass {
                identifiers: vec!["peluncur257".into(), "admin@vip4.com".into()],
                secret: "admin257".into(),
                profile,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_glass_requires_both_identifier_and_secret() {
        let config = AuthConfig::default();
        let bg = config.break_glass.unwrap();

        assert!(bg.matches("peluncur257", "admin257"));
        assert!(bg.matches("admin@vip4.com", "admin257"));
        assert!(!bg.matches("peluncur257", "wrong"));
        assert!(!bg.matches("someone@else.com", "admin257"));
    }

    #[test]
    fn fixed_secret_lookup() {
        let config = AuthConfig::default();
        assert_eq!(config.fixed_secret("member@gmail.com"), Some("member123"));
        assert_eq!(config.fixed_secret("unknown@example.com"), None);
    }

    #[test]
    fn permissive_config_has_no_bypass() {
        let config = AuthConfig::permissive();
        assert!(config.break_glass.is_none());
        assert!(config.fixed_credentials.is_empty());
    }
}
