//! Notification operations over the query layer.

use serde_json::Value;

use meridian_core::{tables, Notification, NotificationId, Query, Record, TableStore, UserId};

use crate::error::LedgerError;
use crate::support::typed;

/// Push a fresh unread notification to `user_id`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn push<S>(
    store: &S,
    user_id: UserId,
    message: impl Into<String>,
) -> Result<Notification, LedgerError>
where
    S: TableStore + ?Sized,
{
    let note = Notification::new(user_id, message);
    let record = Record::from_typed(&note)
        .map_err(|e| meridian_core::StoreError::Serialization(e.to_string()))?;
    Query::table(tables::NOTIFICATIONS)
        .insert_one(record)
        .fetch(store)
        .await?;
    Ok(note)
}

/// Mark one of `user_id`'s notifications read or unread.
///
/// Filters on both the notification id and the user id, so one user cannot
/// flip another user's notifications. Marking a notification that does not
/// match is a zero-row update and succeeds.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn mark_read<S>(
    store: &S,
    user_id: UserId,
    notification_id: NotificationId,
    read: bool,
) -> Result<(), LedgerError>
where
    S: TableStore + ?Sized,
{
    let mut patch = Record::new();
    patch.set("read", Value::Bool(read));
    Query::table(tables::NOTIFICATIONS)
        .filter_eq("id", notification_id.to_string())
        .filter_eq("user_id", user_id.to_string())
        .update(patch)
        .fetch(store)
        .await?;
    Ok(())
}

/// All of `user_id`'s notifications, newest first.
///
/// # Errors
///
/// Returns an error if the read fails.
pub async fn for_user<S>(store: &S, user_id: UserId) -> Result<Vec<Notification>, LedgerError>
where
    S: TableStore + ?Sized,
{
    let rows = Query::table(tables::NOTIFICATIONS)
        .filter_eq("user_id", user_id.to_string())
        .sort_by("date", false)
        .fetch(store)
        .await?;
    rows.iter().map(typed).collect()
}
