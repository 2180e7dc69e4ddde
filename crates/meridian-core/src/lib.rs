//! Core types and query layer for the Meridian wallet platform.
//!
//! This crate provides the foundational pieces shared by every Meridian
//! component:
//!
//! - **Identifiers**: `UserId`, `TransactionId`, `NotificationId`, `BankId`
//! - **Rows**: the engine-opaque [`Record`] and the [`TableStore`] contract
//! - **Queries**: the chainable [`query::Query`] builder and its immutable
//!   [`query::QueryRequest`] descriptor
//! - **Views**: `UserProfile`, `WalletTransaction`, `CompanyBankAccount`,
//!   `Notification`, `Session`
//!
//! # Balance unit
//!
//! Balances and transaction amounts are integer currency units stored as
//! `i64` to avoid floating point precision issues.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bank;
pub mod ids;
pub mod notification;
pub mod profile;
pub mod query;
pub mod record;
pub mod session;
pub mod store;
pub mod tables;
pub mod transaction;

pub use bank::CompanyBankAccount;
pub use ids::{BankId, IdError, NotificationId, TransactionId, UserId};
pub use notification::Notification;
pub use profile::{username_from_email, UserProfile};
pub use query::{Query, QueryError, QueryRequest};
pub use record::Record;
pub use session::Session;
pub use store::{StoreError, TableStore};
pub use transaction::{TransactionKind, TransactionStatus, WalletTransaction};
