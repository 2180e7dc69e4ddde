//! Ledger error types.

use meridian_core::{QueryError, StoreError, TransactionId, UserId};

/// Errors that can occur in wallet and admin operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The balance does not cover the requested amount.
    #[error("insufficient balance: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// The transaction has already reached a terminal status.
    #[error("transaction already settled: {transaction_id}")]
    AlreadySettled {
        /// The transaction that was already settled.
        transaction_id: TransactionId,
    },

    /// No profile exists for the user.
    #[error("profile not found: {user_id}")]
    ProfileNotFound {
        /// The user that was not found.
        user_id: UserId,
    },

    /// No profile matched the transfer recipient.
    #[error("recipient not found: {identifier}")]
    RecipientNotFound {
        /// The username or email that did not resolve.
        identifier: String,
    },

    /// No transaction exists with this id.
    #[error("transaction not found: {transaction_id}")]
    TransactionNotFound {
        /// The transaction that was not found.
        transaction_id: TransactionId,
    },

    /// A profile with this email already exists.
    #[error("email already taken: {email}")]
    EmailTaken {
        /// The email that was already taken.
        email: String,
    },

    /// Sender and recipient are the same wallet.
    #[error("cannot transfer to the same account")]
    SelfTransfer,

    /// The amount must be positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// A settlement verdict must be a terminal status.
    #[error("settlement verdict must be terminal")]
    InvalidVerdict,

    /// A query against the table store failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The table store itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
