//! Notification view over the `notifications` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{NotificationId, UserId};

/// A message pushed to a user's notification list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// The notification id.
    pub id: NotificationId,

    /// The user the message is addressed to.
    pub user_id: UserId,

    /// Human-readable message body.
    pub message: String,

    /// When the message was created.
    pub date: DateTime<Utc>,

    /// Whether the user has marked it read.
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Create a fresh unread notification.
    #[must_use]
    pub fn new(user_id: UserId, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::generate(),
            user_id,
            message: message.into(),
            date: Utc::now(),
            read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notifications_are_unread() {
        let note = Notification::new(UserId::generate(), "Deposit received");
        assert!(!note.read);
        assert_eq!(note.message, "Deposit received");
    }
}
