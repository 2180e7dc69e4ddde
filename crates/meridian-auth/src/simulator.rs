//! Credential verification and session issuance.
//!
//! Identity operations have asymmetric read/write rules that generic table
//! CRUD cannot express, so they live here: the [`Authenticator`] validates
//! credentials against [`AuthConfig`](crate::AuthConfig) rules, issues and
//! destroys the scope's session, and materializes the signed-in user view.

use std::sync::Arc;

use meridian_core::{
    tables, Notification, Query, QueryError, Record, Session, StoreError, TableStore, UserId,
    UserProfile,
};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// A freshly allocated identity.
///
/// Identity allocation creates no profile record; profile creation is a
/// separate second step (see
/// [`SessionFlow::register`](crate::SessionFlow::register)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    /// The allocated user id.
    pub id: UserId,

    /// The registered email.
    pub email: String,
}

/// The materialized signed-in user: profile plus notifications,
/// newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    /// The user's profile view.
    pub profile: UserProfile,

    /// The user's notifications, newest first.
    pub notifications: Vec<Notification>,
}

impl UserAccount {
    /// Whether this user belongs on the administrative surface.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile.is_admin
    }
}

/// Session issuance and validation against an injected table store.
pub struct Authenticator<S> {
    store: Arc<S>,
    config: AuthConfig,
}

impl<S: TableStore> Authenticator<S> {
    /// Create an authenticator over `store` with the given credential rules.
    #[must_use]
    pub fn new(store: Arc<S>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Validate credentials, issue the scope's session, and return the
    /// materialized user.
    ///
    /// The break-glass identity is checked before any store lookup; its use
    /// is logged and its session materializes from config alone. Normal
    /// accounts resolve by exact email match, then validate under the
    /// account's credential rule (fixed literal when configured, otherwise
    /// any non-empty secret).
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] when the identifier is unknown or
    ///   the secret does not validate.
    /// - [`AuthError::Query`]/[`AuthError::Store`] on storage faults.
    pub async fn sign_in(&self, identifier: &str, secret: &str) -> Result<UserAccount, AuthError> {
        if let Some(bg) = &self.config.break_glass {
            if bg.matches(identifier, secret) {
                tracing::warn!(identifier = %identifier, "break-glass sign-in");
                let session = Session::issue(bg.profile.id);
                self.store.write_session(&session).await?;
                return Ok(UserAccount {
                    profile: bg.profile.clone(),
                    notifications: Vec::new(),
                });
            }
        }

        let record = match Query::table(tables::PROFILES)
            .filter_eq("email", identifier)
            .fetch_one(self.store.as_ref())
            .await
        {
            Ok(record) => record,
            Err(QueryError::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !self.credential_valid(identifier, secret) {
            return Err(AuthError::InvalidCredentials);
        }

        let profile: UserProfile = typed(&record)?;
        let session = Session::issue(profile.id);
        self.store.write_session(&session).await?;
        tracing::info!(user_id = %profile.id, "signed in");

        let notifications = self.notifications_for(profile.id).await?;
        Ok(UserAccount {
            profile,
            notifications,
        })
    }

    /// Allocate a new identity.
    ///
    /// No profile record is created here; the caller performs that second
    /// step. The secret is accepted for interface parity but not persisted
    /// anywhere — the account validates under the permissive rule on later
    /// sign-ins.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AlreadyExists`] when a profile with this email exists.
    /// - [`AuthError::Query`] on storage faults.
    pub async fn sign_up(&self, email: &str, _secret: &str) -> Result<NewIdentity, AuthError> {
        let existing = Query::table(tables::PROFILES)
            .filter_eq("email", email)
            .fetch(self.store.as_ref())
            .await?;
        if !existing.is_empty() {
            return Err(AuthError::AlreadyExists {
                identifier: email.to_string(),
            });
        }

        Ok(NewIdentity {
            id: UserId::generate(),
            email: email.to_string(),
        })
    }

    /// Destroy the scope's session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error only on storage faults.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.clear_session().await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// The live session, if any. Presence is the only check performed; there
    /// is no expiry and no revocation.
    ///
    /// # Errors
    ///
    /// Returns an error only on storage faults.
    pub async fn session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.store.read_session().await?)
    }

    /// Materialize the user view for the live session.
    ///
    /// A break-glass session materializes from config. A session whose
    /// profile record is missing yields `Ok(None)` — the orphaned-identity
    /// case.
    ///
    /// # Errors
    ///
    /// Returns an error only on storage faults.
    pub async fn current_user(&self) -> Result<Option<UserAccount>, AuthError> {
        let Some(session) = self.store.read_session().await? else {
            return Ok(None);
        };

        if let Some(bg) = &self.config.break_glass {
            if bg.profile.id == session.user_id {
                return Ok(Some(UserAccount {
                    profile: bg.profile.clone(),
                    notifications: Vec::new(),
                }));
            }
        }

        let record = match Query::table(tables::PROFILES)
            .filter_eq("id", session.user_id.to_string())
            .fetch_one(self.store.as_ref())
            .await
        {
            Ok(record) => record,
            Err(QueryError::NotFound) => {
                tracing::warn!(user_id = %session.user_id, "session has no backing profile");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let profile: UserProfile = typed(&record)?;
        let notifications = self.notifications_for(profile.id).await?;
        Ok(Some(UserAccount {
            profile,
            notifications,
        }))
    }

    /// The store handle this authenticator operates on.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn credential_valid(&self, identifier: &str, secret: &str) -> bool {
        match self.config.fixed_secret(identifier) {
            Some(expected) => secret == expected,
            None => !secret.is_empty(),
        }
    }

    async fn notifications_for(&self, user_id: UserId) -> Result<Vec<Notification>, AuthError> {
        let rows = Query::table(tables::NOTIFICATIONS)
            .filter_eq("user_id", user_id.to_string())
            .sort_by("date", false)
            .fetch(self.store.as_ref())
            .await?;
        rows.iter().map(typed).collect()
    }
}

fn typed<T: serde::de::DeserializeOwned>(record: &Record) -> Result<T, AuthError> {
    record
        .to_typed()
        .map_err(|e| AuthError::Store(StoreError::Serialization(e.to_string())))
}
