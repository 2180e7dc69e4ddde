//! Authentication simulator and session state machine for the Meridian
//! wallet platform.
//!
//! This crate provides:
//!
//! - [`Authenticator`]: credential verification and session issuance against
//!   an injected [`meridian_core::TableStore`] handle
//! - [`AuthConfig`]: per-account credential rules and the explicit
//!   break-glass identity
//! - [`SessionFlow`]: the `Loading -> Unauthenticated | Authenticated` state
//!   machine with the absolute admin/member surface gate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use meridian_auth::{AuthConfig, SessionFlow, Surface};
//! use meridian_store::MemoryStore;
//!
//! # async fn example() {
//! let store = Arc::new(MemoryStore::new());
//! let mut flow = SessionFlow::new(store, AuthConfig::default());
//!
//! flow.resolve().await;
//! if flow.login("member@gmail.com", "member123").await {
//!     assert_eq!(flow.route("/trade").surface, Surface::Dashboard);
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod flow;
pub mod simulator;

pub use config::{AuthConfig, BreakGlass, BREAK_GLASS_USER_ID};
pub use error::AuthError;
pub use flow::{AuthStatus, RegisterRequest, Route, SessionFlow, Surface};
pub use simulator::{Authenticator, NewIdentity, UserAccount};
