//! Storage backends for the Meridian wallet platform.
//!
//! This crate provides the [`meridian_core::TableStore`] implementations:
//!
//! - [`RocksStore`]: durable per-scope storage using `RocksDB`
//! - [`MemoryStore`]: ephemeral storage with identical semantics, for tests
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `tables`: one entry per logical table, keyed by the table name, holding
//!   the full ordered row sequence encoded as CBOR
//! - `session`: the scope's live session under a single fixed key
//!
//! Tables are materialized with their predefined seed content on first read
//! (see [`seed`]); writes are full replaces and survive subsequent reads in
//! the same scope.
//!
//! # Example
//!
//! ```no_run
//! use meridian_core::{tables, TableStore};
//! use meridian_store::RocksStore;
//!
//! # async fn example() -> Result<(), meridian_core::StoreError> {
//! let store = RocksStore::open("/tmp/meridian-db")?;
//!
//! // First read materializes the seed accounts.
//! let profiles = store.read_table(tables::PROFILES).await?;
//! assert!(!profiles.is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod keys;
pub mod memory;
pub mod rocks;
pub mod schema;
pub mod seed;

pub use memory::MemoryStore;
pub use rocks::RocksStore;
