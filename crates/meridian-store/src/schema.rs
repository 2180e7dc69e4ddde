//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Logical tables, keyed by table name. The value is the full ordered
    /// row sequence encoded as CBOR.
    pub const TABLES: &str = "tables";

    /// The live session for this scope, under a single fixed key.
    pub const SESSION: &str = "session";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::TABLES, cf::SESSION]
}
