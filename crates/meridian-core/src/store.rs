//! The storage contract the query layer executes against.

use async_trait::async_trait;

use crate::record::Record;
use crate::session::Session;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable, per-table ordered-sequence storage for one scope.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (`RocksDB` for a durable scope, in-memory for testing, or
/// a remote transport).
///
/// # Contract
///
/// - `read_table` on a table never before accessed in this scope must
///   materialize the table's predefined seed content before returning.
///   Tables with no seed definition read as an empty sequence and are not
///   materialized.
/// - `write_table` is a full replace. Writes survive subsequent reads within
///   the same scope; there is no cross-scope sharing.
/// - Expected conditions (absent table, absent session) are successes, not
///   errors.
///
/// # Concurrency
///
/// No locking is provided. The read-modify-write sequence performed by the
/// query layer is not atomic across await points; two operations awaited
/// concurrently against the same table can race, and the last full-table
/// write wins. Callers needing atomicity must serialize at a higher layer.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read the ordered sequence of records for `table`, seeding it on first
    /// access.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn read_table(&self, table: &str) -> Result<Vec<Record>, StoreError>;

    /// Replace the full ordered sequence of records for `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn write_table(&self, table: &str, rows: &[Record]) -> Result<(), StoreError>;

    /// Read the live session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn read_session(&self) -> Result<Option<Session>, StoreError>;

    /// Persist the live session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn write_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove the live session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn clear_session(&self) -> Result<(), StoreError>;
}
