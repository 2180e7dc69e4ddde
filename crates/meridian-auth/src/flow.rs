//! Application-level session state machine and role-gated routing.
//!
//! `LOADING -> UNAUTHENTICATED | AUTHENTICATED`. The admin/member split is
//! not a separate formal state: it is a routing guard evaluated from the
//! materialized user, and the separation is absolute — no surface renders
//! for both roles.

use std::sync::Arc;

use meridian_core::{tables, username_from_email, Query, Record, TableStore, UserProfile};

use crate::config::AuthConfig;
use crate::simulator::{Authenticator, UserAccount};

/// Authentication status of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Session resolution has not completed yet.
    Loading,

    /// No signed-in identity.
    Unauthenticated,

    /// A user is signed in and materialized.
    Authenticated,
}

/// Which UI surface mounts for a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// The startup spinner, while resolution is in flight.
    Loading,

    /// Login/registration surface.
    SignIn,

    /// The administrative console. Admins see nothing else.
    Admin,

    /// The member trading dashboard. Members see nothing else.
    Dashboard,
}

/// A resolved navigation: the surface to mount, and the path to replace the
/// current one with when the requested path is not served directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// The surface that mounts.
    pub surface: Surface,

    /// Redirect target, when the requested path is not served as-is.
    pub redirect: Option<&'static str>,
}

/// Registration input. The password is used for identity allocation only
/// and is never persisted to the profile record.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Sign-in email.
    pub email: String,

    /// Desired password.
    pub password: String,

    /// Display name.
    pub full_name: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Optional handle; derived from the email when absent.
    pub username: Option<String>,
}

/// Paths served by the member dashboard.
const MEMBER_PATHS: &[&str] = &[
    "/",
    "/trade",
    "/wallet/balance",
    "/wallet/add-balance",
    "/wallet/transfer",
    "/wallet/withdrawal",
    "/investment",
    "/kyc",
    "/security",
    "/setting",
    "/faq",
];

/// Paths served by the sign-in surface.
const AUTH_PATHS: &[&str] = &["/", "/register", "/forgot-password"];

/// The session/authorization state machine.
pub struct SessionFlow<S> {
    auth: Authenticator<S>,
    store: Arc<S>,
    status: AuthStatus,
    user: Option<UserAccount>,
    error: Option<String>,
}

impl<S: TableStore> SessionFlow<S> {
    /// Create a flow in the `Loading` state. Call [`resolve`](Self::resolve)
    /// to settle it.
    #[must_use]
    pub fn new(store: Arc<S>, config: AuthConfig) -> Self {
        Self {
            auth: Authenticator::new(Arc::clone(&store), config),
            store,
            status: AuthStatus::Loading,
            user: None,
            error: None,
        }
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.status
    }

    /// The materialized user, when authenticated.
    #[must_use]
    pub fn user(&self) -> Option<&UserAccount> {
        self.user.as_ref()
    }

    /// The last surfaced error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The authenticator backing this flow.
    #[must_use]
    pub fn authenticator(&self) -> &Authenticator<S> {
        &self.auth
    }

    /// Resolve the persisted session at startup:
    /// `Loading -> Authenticated | Unauthenticated`.
    pub async fn resolve(&mut self) {
        self.refresh().await;
    }

    /// Re-materialize the user view from the live session.
    pub async fn refresh(&mut self) {
        match self.auth.current_user().await {
            Ok(Some(user)) => {
                self.user = Some(user);
                self.status = AuthStatus::Authenticated;
            }
            Ok(None) => {
                self.user = None;
                self.status = AuthStatus::Unauthenticated;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.user = None;
                self.status = AuthStatus::Unauthenticated;
            }
        }
    }

    /// Sign in. Success authenticates the flow; failure surfaces the error
    /// message and leaves the flow unauthenticated.
    pub async fn login(&mut self, identifier: &str, secret: &str) -> bool {
        self.error = None;
        match self.auth.sign_in(identifier, secret).await {
            Ok(user) => {
                self.user = Some(user);
                self.status = AuthStatus::Authenticated;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.user = None;
                self.status = AuthStatus::Unauthenticated;
                false
            }
        }
    }

    /// Sign out: `-> Unauthenticated` unconditionally, clearing the user and
    /// any error. Clearing the persisted session is best-effort; a failure
    /// is logged and recovered on the next resolve.
    pub async fn logout(&mut self) {
        if let Err(e) = self.auth.sign_out().await {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        self.user = None;
        self.error = None;
        self.status = AuthStatus::Unauthenticated;
    }

    /// Register a new account: identity allocation, then profile creation.
    ///
    /// Does NOT change the authentication status — the caller signs in
    /// explicitly afterward. The two steps have no compensating rollback: if
    /// the profile insert fails after identity allocation succeeded, an
    /// orphaned identity with no profile results.
    pub async fn register(&mut self, request: RegisterRequest) -> bool {
        self.error = None;

        let identity = match self.auth.sign_up(&request.email, &request.password).await {
            Ok(identity) => identity,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        let username = request
            .username
            .unwrap_or_else(|| username_from_email(&request.email));
        let profile = UserProfile::new(
            identity.id,
            identity.email,
            request.full_name,
            username,
            request.phone_number,
        );

        let record = match Record::from_typed(&profile) {
            Ok(record) => record,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        match Query::table(tables::PROFILES)
            .insert_one(record)
            .fetch(self.store.as_ref())
            .await
        {
            Ok(_) => {
                tracing::info!(user_id = %profile.id, "registered account");
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Resolve a navigation under the role gate.
    ///
    /// Admins are confined to the administrative surface: every other path
    /// redirects to `/admin`. Members never see it: `/admin` (and any
    /// unknown path) redirects to the dashboard root.
    #[must_use]
    pub fn route(&self, path: &str) -> Route {
        match self.status {
            AuthStatus::Loading => Route {
                surface: Surface::Loading,
                redirect: None,
            },
            AuthStatus::Unauthenticated => Route {
                surface: Surface::SignIn,
                redirect: (!AUTH_PATHS.contains(&path)).then_some("/"),
            },
            AuthStatus::Authenticated => {
                let is_admin = self.user.as_ref().is_some_and(UserAccount::is_admin);
                if is_admin {
                    Route {
                        surface: Surface::Admin,
                        redirect: (path != "/admin").then_some("/admin"),
                    }
                } else if path == "/wallet" {
                    Route {
                        surface: Surface::Dashboard,
                        redirect: Some("/wallet/balance"),
                    }
                } else if MEMBER_PATHS.contains(&path) {
                    Route {
                        surface: Surface::Dashboard,
                        redirect: None,
                    }
                } else {
                    Route {
                        surface: Surface::Dashboard,
                        redirect: Some("/"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_store::MemoryStore;

    fn flow() -> SessionFlow<MemoryStore> {
        SessionFlow::new(Arc::new(MemoryStore::new()), AuthConfig::default())
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "hunter22".into(),
            full_name: "New Trader".into(),
            phone_number: "0811222333".into(),
            username: None,
        }
    }

    #[tokio::test]
    async fn starts_loading_and_resolves_unauthenticated() {
        let mut flow = flow();
        assert_eq!(flow.status(), AuthStatus::Loading);
        assert_eq!(flow.route("/").surface, Surface::Loading);

        flow.resolve().await;
        assert_eq!(flow.status(), AuthStatus::Unauthenticated);
        assert!(flow.user().is_none());
    }

    #[tokio::test]
    async fn resolve_restores_a_persisted_session() {
        let store = Arc::new(MemoryStore::new());

        {
            let mut first = SessionFlow::new(Arc::clone(&store), AuthConfig::default());
            assert!(first.login("member@gmail.com", "member123").await);
        }

        // A fresh flow over the same scope picks the session back up.
        let mut second = SessionFlow::new(store, AuthConfig::default());
        second.resolve().await;
        assert_eq!(second.status(), AuthStatus::Authenticated);
        assert_eq!(second.user().unwrap().profile.email, "member@gmail.com");
    }

    #[tokio::test]
    async fn failed_login_surfaces_an_error() {
        let mut flow = flow();
        flow.resolve().await;

        assert!(!flow.login("member@gmail.com", "wrong").await);
        assert_eq!(flow.status(), AuthStatus::Unauthenticated);
        assert_eq!(flow.error(), Some("invalid login credentials"));

        // A later success clears it.
        assert!(flow.login("member@gmail.com", "member123").await);
        assert_eq!(flow.status(), AuthStatus::Authenticated);
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn logout_clears_user_and_error() {
        let mut flow = flow();
        assert!(flow.login("member@gmail.com", "member123").await);

        flow.logout().await;
        assert_eq!(flow.status(), AuthStatus::Unauthenticated);
        assert!(flow.user().is_none());
        assert!(flow.error().is_none());
        assert!(flow
            .authenticator()
            .session()
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn register_then_login_under_the_permissive_rule() {
        let mut flow = flow();
        flow.resolve().await;

        assert!(flow.register(register_request("new@example.com")).await);
        // Registration does not authenticate.
        assert_eq!(flow.status(), AuthStatus::Unauthenticated);

        assert!(flow.login("new@example.com", "hunter22").await);
        let user = flow.user().unwrap();
        assert_eq!(user.profile.username, "new");
        assert!(!user.profile.is_admin);
        assert_eq!(user.profile.balance, 0);
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let mut flow = flow();
        assert!(!flow.register(register_request("member@gmail.com")).await);
        assert!(flow.error().unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn member_routes_never_reach_the_admin_surface() {
        let mut flow = flow();
        assert!(flow.login("member@gmail.com", "member123").await);

        assert_eq!(
            flow.route("/admin"),
            Route {
                surface: Surface::Dashboard,
                redirect: Some("/")
            }
        );
        assert_eq!(
            flow.route("/trade"),
            Route {
                surface: Surface::Dashboard,
                redirect: None
            }
        );
        assert_eq!(
            flow.route("/wallet"),
            Route {
                surface: Surface::Dashboard,
                redirect: Some("/wallet/balance")
            }
        );
        assert_eq!(flow.route("/no-such-page").redirect, Some("/"));
    }

    #[tokio::test]
    async fn admin_routes_all_resolve_to_the_admin_surface() {
        let mut flow = flow();
        assert!(flow.login("panggilajabryan@gmail.com", "admin").await);

        for path in ["/", "/trade", "/wallet/balance", "/no-such-page"] {
            let route = flow.route(path);
            assert_eq!(route.surface, Surface::Admin);
            assert_eq!(route.redirect, Some("/admin"));
        }
        assert_eq!(
            flow.route("/admin"),
            Route {
                surface: Surface::Admin,
                redirect: None
            }
        );
    }

    #[tokio::test]
    async fn break_glass_login_is_admin_gated() {
        let mut flow = flow();
        assert!(flow.login("peluncur257", "admin257").await);
        assert_eq!(flow.route("/").surface, Surface::Admin);
    }

    #[tokio::test]
    async fn unauthenticated_unknown_paths_redirect_to_root() {
        let mut flow = flow();
        flow.resolve().await;

        assert_eq!(flow.route("/register").redirect, None);
        assert_eq!(flow.route("/wallet/balance").redirect, Some("/"));
        assert_eq!(flow.route("/wallet/balance").surface, Surface::SignIn);
    }
}
