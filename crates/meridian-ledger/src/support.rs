//! Record plumbing shared by wallet and admin operations.

use serde_json::Value;

use meridian_core::{
    tables, Query, QueryError, Record, StoreError, TableStore, UserId, UserProfile,
    WalletTransaction,
};

use crate::error::LedgerError;

/// Fetch the profile for `user_id`.
pub(crate) async fn fetch_profile<S>(store: &S, user_id: UserId) -> Result<UserProfile, LedgerError>
where
    S: TableStore + ?Sized,
{
    let record = match Query::table(tables::PROFILES)
        .filter_eq("id", user_id.to_string())
        .fetch_one(store)
        .await
    {
        Ok(record) => record,
        Err(QueryError::NotFound) => return Err(LedgerError::ProfileNotFound { user_id }),
        Err(e) => return Err(e.into()),
    };
    typed(&record)
}

/// Replace the balance on `user_id`'s profile.
///
/// The surrounding read-modify-write is not atomic across await points;
/// concurrent wallet operations against the same profile can race
/// (last-write-wins). Callers needing atomicity serialize above this layer.
pub(crate) async fn set_balance<S>(
    store: &S,
    user_id: UserId,
    balance: i64,
) -> Result<(), LedgerError>
where
    S: TableStore + ?Sized,
{
    let mut patch = Record::new();
    patch.set("balance", Value::from(balance));
    Query::table(tables::PROFILES)
        .filter_eq("id", user_id.to_string())
        .update(patch)
        .fetch(store)
        .await?;
    Ok(())
}

/// Append ledger entries to the transactions table.
pub(crate) async fn insert_transactions<S>(
    store: &S,
    txs: &[WalletTransaction],
) -> Result<(), LedgerError>
where
    S: TableStore + ?Sized,
{
    let rows = txs
        .iter()
        .map(|tx| Record::from_typed(tx).map_err(|e| StoreError::Serialization(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Query::table(tables::TRANSACTIONS)
        .insert(rows)
        .fetch(store)
        .await?;
    Ok(())
}

/// Deserialize a record into a typed view.
pub(crate) fn typed<T: serde::de::DeserializeOwned>(record: &Record) -> Result<T, LedgerError> {
    record
        .to_typed()
        .map_err(|e| LedgerError::Store(StoreError::Serialization(e.to_string())))
}
