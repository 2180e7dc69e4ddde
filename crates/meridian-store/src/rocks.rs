//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the
//! [`TableStore`] trait: one entry per logical table in the `tables` column
//! family (full row sequence, CBOR-encoded) and a single-key `session`
//! column family.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};

use meridian_core::{Record, Session, StoreError, TableStore};

use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::seed;

/// `RocksDB`-backed storage for one durable scope.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!("opened table store");

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T, StoreError> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load a table's rows if the table has ever been written in this scope.
    fn load_table(&self, table: &str) -> Result<Option<Vec<Record>>, StoreError> {
        let cf = self.cf(cf::TABLES)?;
        self.db
            .get_cf(&cf, keys::table_key(table))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Replace a table's rows.
    fn store_table(&self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
        let cf = self.cf(cf::TABLES)?;
        let value = Self::serialize(&rows)?;
        self.db
            .put_cf(&cf, keys::table_key(table), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

#[async_trait]
impl TableStore for RocksStore {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        if let Some(rows) = self.load_table(table)? {
            return Ok(rows);
        }

        match seed::seed_rows(table) {
            Some(rows) => {
                self.store_table(table, &rows)?;
                tracing::debug!(table = %table, rows = rows.len(), "seeded table on first access");
                Ok(rows)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write_table(&self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
        self.store_table(table, rows)
    }

    async fn read_session(&self) -> Result<Option<Session>, StoreError> {
        let cf = self.cf(cf::SESSION)?;
        self.db
            .get_cf(&cf, keys::session_key())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    async fn write_session(&self, session: &Session) -> Result<(), StoreError> {
        let cf = self.cf(cf::SESSION)?;
        let value = Self::serialize(session)?;
        self.db
            .put_cf(&cf, keys::session_key(), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        let cf = self.cf(cf::SESSION)?;
        self.db
            .delete_cf(&cf, keys::session_key())
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
