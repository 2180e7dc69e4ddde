//! Wallet, admin, and notification operations for the Meridian wallet
//! platform.
//!
//! Everything here is built on the query layer from `meridian-core` against
//! an injected store handle:
//!
//! - [`Wallet`]: member operations — balance, deposit/withdrawal requests,
//!   immediate transfers, transaction history
//! - [`AdminDesk`]: the administrative console — user management, balance
//!   adjustments, and exactly-once transaction settlement
//! - [`notifications`]: push/mark-read/list helpers
//!
//! # Lifecycle
//!
//! Deposit and withdrawal requests create `PENDING` ledger entries with no
//! balance effect. An administrator settles each entry exactly once:
//! `SUCCESS` applies the balance effect, `REJECTED` applies none, and
//! terminal entries never transition again.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod admin;
pub mod error;
pub mod notifications;
mod support;
pub mod wallet;

pub use admin::{AdminDesk, Adjustment, CreateUserRequest, ProfileUpdate};
pub use error::LedgerError;
pub use wallet::Wallet;
