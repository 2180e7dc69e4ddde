//! Remote backend client for the Meridian wallet platform.
//!
//! The hosted variant of the data layer: [`RemoteClient`] maps
//! [`meridian_core::QueryRequest`] descriptors 1:1 onto a REST-over-HTTP
//! tabular query protocol, and wraps the identity-provider API that issues
//! bearer sessions.
//!
//! # Example
//!
//! ```no_run
//! use meridian_client::RemoteClient;
//! use meridian_core::Query;
//!
//! # async fn example() -> Result<(), meridian_client::ClientError> {
//! let client = RemoteClient::new("https://api.example.com", "project-api-key");
//!
//! let session = client.sign_in("member@gmail.com", "member123").await?;
//! let client = client.with_bearer(session.access_token);
//!
//! let pending = client
//!     .execute(
//!         Query::table("transactions")
//!             .filter_eq("status", "PENDING")
//!             .sort_by("date", false)
//!             .into_request(),
//!     )
//!     .await?;
//! println!("{} pending transactions", pending.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, RemoteClient};
pub use error::ClientError;
pub use types::*;
