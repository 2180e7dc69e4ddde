//! Ledger transaction view over the `transactions` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::CompanyBankAccount;
use crate::ids::{TransactionId, UserId};

/// A wallet ledger transaction.
///
/// Deposit and withdrawal requests are created `Pending` and settle exactly
/// once through an administrative verdict; transfers and adjustments settle
/// immediately. Terminal statuses are final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Time-ordered transaction id.
    pub id: TransactionId,

    /// The wallet this entry belongs to.
    pub user_id: UserId,

    /// What kind of ledger entry this is.
    pub kind: TransactionKind,

    /// Lifecycle status.
    pub status: TransactionStatus,

    /// Amount moved. Positive, with the kind determining the direction,
    /// except administrative adjustments, which carry a signed delta.
    pub amount: i64,

    /// When the entry was created.
    pub date: DateTime<Utc>,

    /// Bank name for deposits/withdrawals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,

    /// Bank account number for deposits/withdrawals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    /// Bank account holder for deposits/withdrawals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,

    /// The other wallet involved in a transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<UserId>,
}

impl WalletTransaction {
    /// Create a pending deposit request against a company bank account.
    #[must_use]
    pub fn deposit(user_id: UserId, amount: i64, destination: &CompanyBankAccount) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind: TransactionKind::Deposit,
            status: TransactionStatus::Pending,
            amount,
            date: Utc::now(),
            bank_name: Some(destination.bank_name.clone()),
            account_number: Some(destination.account_number.clone()),
            account_holder_name: Some(destination.account_holder_name.clone()),
            counterparty: None,
        }
    }

    /// Create a pending withdrawal request to the user's own bank account.
    #[must_use]
    pub fn withdrawal(
        user_id: UserId,
        amount: i64,
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
        account_holder_name: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind: TransactionKind::Withdrawal,
            status: TransactionStatus::Pending,
            amount,
            date: Utc::now(),
            bank_name: Some(bank_name.into()),
            account_number: Some(account_number.into()),
            account_holder_name: Some(account_holder_name.into()),
            counterparty: None,
        }
    }

    /// Create the settled outgoing/incoming pair for an internal transfer.
    #[must_use]
    pub fn transfer_pair(from: UserId, to: UserId, amount: i64) -> (Self, Self) {
        let date = Utc::now();
        let outgoing = Self {
            id: TransactionId::generate(),
            user_id: from,
            kind: TransactionKind::TransferOut,
            status: TransactionStatus::Success,
            amount,
            date,
            bank_name: None,
            account_number: None,
            account_holder_name: None,
            counterparty: Some(to),
        };
        let incoming = Self {
            id: TransactionId::generate(),
            user_id: to,
            kind: TransactionKind::TransferIn,
            status: TransactionStatus::Success,
            amount,
            date,
            bank_name: None,
            account_number: None,
            account_holder_name: None,
            counterparty: Some(from),
        };
        (outgoing, incoming)
    }

    /// Create a settled administrative balance adjustment. The amount is a
    /// signed delta.
    #[must_use]
    pub fn adjustment(user_id: UserId, amount: i64) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind: TransactionKind::Adjustment,
            status: TransactionStatus::Success,
            amount,
            date: Utc::now(),
            bank_name: None,
            account_number: None,
            account_holder_name: None,
            counterparty: None,
        }
    }
}

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Funds coming in from an external bank transfer.
    Deposit,

    /// Funds going out to the user's bank account.
    Withdrawal,

    /// Incoming side of an internal transfer.
    TransferIn,

    /// Outgoing side of an internal transfer.
    TransferOut,

    /// Administrative balance correction.
    Adjustment,
}

/// Lifecycle status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Awaiting an administrative verdict.
    Pending,

    /// Settled and applied.
    Success,

    /// Settled without effect.
    Rejected,
}

impl TransactionStatus {
    /// Whether this status is final. Terminal entries never transition again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Rejected)
    }
}
