//! In-memory storage implementation.
//!
//! Same seed semantics as the durable backend, but the scope dies with the
//! value. Used for tests and ephemeral scopes.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use meridian_core::{Record, Session, StoreError, TableStore};

use crate::seed;

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Record>>,
    session: Option<Session>,
}

/// Memory-backed storage for one ephemeral scope.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty scope. Tables are seeded on first read.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(rows) = inner.tables.get(table) {
            return Ok(rows.clone());
        }

        match seed::seed_rows(table) {
            Some(rows) => {
                inner.tables.insert(table.to_string(), rows.clone());
                tracing::debug!(table = %table, rows = rows.len(), "seeded table on first access");
                Ok(rows)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write_table(&self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .tables
            .insert(table.to_string(), rows.to_vec());
        Ok(())
    }

    async fn read_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.read().await.session.clone())
    }

    async fn write_session(&self, session: &Session) -> Result<(), StoreError> {
        self.inner.write().await.session = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        self.inner.write().await.session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{tables, UserId};
    use serde_json::json;

    #[tokio::test]
    async fn seeds_on_first_read_and_persists_within_scope() {
        let store = MemoryStore::new();
        let profiles = store.read_table(tables::PROFILES).await.unwrap();
        assert_eq!(profiles.len(), 4);

        let rows = vec![Record::from_value(json!({ "id": "n1" })).unwrap()];
        store.write_table(tables::NOTIFICATIONS, &rows).await.unwrap();
        assert_eq!(store.read_table(tables::NOTIFICATIONS).await.unwrap(), rows);
    }

    #[tokio::test]
    async fn scopes_do_not_share_state() {
        let a = MemoryStore::new();
        let b = MemoryStore::new();

        let rows = vec![Record::from_value(json!({ "id": "t1" })).unwrap()];
        a.write_table(tables::TRANSACTIONS, &rows).await.unwrap();

        // A fresh scope sees only the (empty) seed.
        assert!(b.read_table(tables::TRANSACTIONS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_slot_roundtrip() {
        let store = MemoryStore::new();
        let session = Session::issue(UserId::generate());
        store.write_session(&session).await.unwrap();
        assert_eq!(store.read_session().await.unwrap(), Some(session));
        store.clear_session().await.unwrap();
        assert!(store.read_session().await.unwrap().is_none());
    }
}
