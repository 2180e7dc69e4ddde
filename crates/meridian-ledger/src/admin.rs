//! Administrative console operations.

use std::sync::Arc;

use serde_json::Value;

use meridian_core::{
    tables, username_from_email, Query, QueryError, Record, StoreError, TableStore, TransactionId,
    TransactionKind, TransactionStatus, UserId, UserProfile, WalletTransaction,
};

use crate::error::LedgerError;
use crate::notifications;
use crate::support::{fetch_profile, insert_transactions, set_balance, typed};

/// Input for administrative user creation.
///
/// No credential is part of the request: the created account validates
/// under the mock-permissive rule, and no plaintext secret is ever stored on
/// the profile record.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    /// Sign-in email.
    pub email: String,

    /// Display name.
    pub full_name: String,

    /// Optional handle; derived from the email when absent.
    pub username: Option<String>,

    /// Contact phone number.
    pub phone_number: String,

    /// Whether the account gets the administrative surface.
    pub is_admin: bool,

    /// Whether the account starts active.
    pub is_verified: bool,

    /// Opening balance.
    pub balance: i64,
}

/// A partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name.
    pub full_name: Option<String>,

    /// New phone number.
    pub phone_number: Option<String>,

    /// New avatar URL.
    pub profile_picture_url: Option<String>,

    /// New active/verified flag.
    pub is_verified: Option<bool>,
}

/// Direction of an administrative balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Add to the balance.
    Credit,

    /// Subtract from the balance.
    Debit,
}

/// Administrative operations over users and the transaction ledger.
pub struct AdminDesk<S> {
    store: Arc<S>,
}

impl<S: TableStore> AdminDesk<S> {
    /// Create admin operations over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All profiles, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, LedgerError> {
        let rows = Query::table(tables::PROFILES)
            .sort_by("created_at", false)
            .fetch(self.store.as_ref())
            .await?;
        rows.iter().map(typed).collect()
    }

    /// Create a profile directly, with admin-specified flags and opening
    /// balance.
    ///
    /// # Errors
    ///
    /// Fails with [`LedgerError::EmailTaken`] when a profile with this email
    /// exists.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserProfile, LedgerError> {
        let existing = Query::table(tables::PROFILES)
            .filter_eq("email", request.email.as_str())
            .fetch(self.store.as_ref())
            .await?;
        if !existing.is_empty() {
            return Err(LedgerError::EmailTaken {
                email: request.email,
            });
        }

        let username = request
            .username
            .unwrap_or_else(|| username_from_email(&request.email));
        let mut profile = UserProfile::new(
            UserId::generate(),
            request.email,
            request.full_name,
            username,
            request.phone_number,
        );
        profile.is_admin = request.is_admin;
        profile.is_verified = request.is_verified;
        profile.balance = request.balance;

        let record = Record::from_typed(&profile)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Query::table(tables::PROFILES)
            .insert_one(record)
            .fetch(self.store.as_ref())
            .await?;
        tracing::info!(user_id = %profile.id, "admin created account");

        Ok(profile)
    }

    /// Adjust a user's balance by a positive amount in the given direction,
    /// recording a settled adjustment entry.
    ///
    /// Non-negativity is not enforced at this layer: a debit may drive the
    /// balance negative. Returns the new balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] for a non-positive amount.
    /// - [`LedgerError::ProfileNotFound`] for an unknown user.
    pub async fn adjust_balance(
        &self,
        user_id: UserId,
        amount: i64,
        direction: Adjustment,
    ) -> Result<i64, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let delta = match direction {
            Adjustment::Credit => amount,
            Adjustment::Debit => -amount,
        };

        let profile = fetch_profile(self.store.as_ref(), user_id).await?;
        let new_balance = profile.balance + delta;
        set_balance(self.store.as_ref(), user_id, new_balance).await?;

        insert_transactions(
            self.store.as_ref(),
            &[WalletTransaction::adjustment(user_id, delta)],
        )
        .await?;
        tracing::info!(user_id = %user_id, delta, new_balance, "balance adjusted");

        notifications::push(
            self.store.as_ref(),
            user_id,
            format!("Your balance was adjusted by {delta}."),
        )
        .await?;

        Ok(new_balance)
    }

    /// Activate or block a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn set_user_active(&self, user_id: UserId, active: bool) -> Result<(), LedgerError> {
        let mut patch = Record::new();
        patch.set("is_verified", Value::Bool(active));
        Query::table(tables::PROFILES)
            .filter_eq("id", user_id.to_string())
            .update(patch)
            .fetch(self.store.as_ref())
            .await?;
        tracing::info!(user_id = %user_id, active, "user status changed");
        Ok(())
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_user(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<(), LedgerError> {
        let mut patch = Record::new();
        if let Some(full_name) = update.full_name {
            patch.set("full_name", Value::String(full_name));
        }
        if let Some(phone_number) = update.phone_number {
            patch.set("phone_number", Value::String(phone_number));
        }
        if let Some(url) = update.profile_picture_url {
            patch.set("profile_picture_url", Value::String(url));
        }
        if let Some(is_verified) = update.is_verified {
            patch.set("is_verified", Value::Bool(is_verified));
        }

        if patch.is_empty() {
            tracing::debug!(user_id = %user_id, "empty profile update, nothing to do");
            return Ok(());
        }

        Query::table(tables::PROFILES)
            .filter_eq("id", user_id.to_string())
            .update(patch)
            .fetch(self.store.as_ref())
            .await?;
        Ok(())
    }

    /// The full ledger, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn list_transactions(&self) -> Result<Vec<WalletTransaction>, LedgerError> {
        // ULID ids are time-ordered, so sorting on the id is chronological.
        let rows = Query::table(tables::TRANSACTIONS)
            .sort_by("id", false)
            .fetch(self.store.as_ref())
            .await?;
        rows.iter().map(typed).collect()
    }

    /// Ledger entries still awaiting a verdict, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn pending_transactions(&self) -> Result<Vec<WalletTransaction>, LedgerError> {
        let rows = Query::table(tables::TRANSACTIONS)
            .filter_eq("status", "PENDING")
            .sort_by("id", false)
            .fetch(self.store.as_ref())
            .await?;
        rows.iter().map(typed).collect()
    }

    /// Settle a pending transaction with a terminal verdict, exactly once.
    ///
    /// A `SUCCESS` verdict applies the balance effect: deposits credit the
    /// wallet, withdrawals debit it. A `REJECTED` verdict settles with no
    /// balance effect. The user is notified of the verdict either way.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidVerdict`] when the verdict is not terminal.
    /// - [`LedgerError::TransactionNotFound`] for an unknown id.
    /// - [`LedgerError::AlreadySettled`] when the transaction is already
    ///   terminal; the ledger is left unchanged.
    /// - [`LedgerError::InsufficientBalance`] when a withdrawal settlement
    ///   cannot be covered; the transaction stays `PENDING`.
    pub async fn settle_transaction(
        &self,
        transaction_id: TransactionId,
        verdict: TransactionStatus,
    ) -> Result<WalletTransaction, LedgerError> {
        if !verdict.is_terminal() {
            return Err(LedgerError::InvalidVerdict);
        }

        let record = match Query::table(tables::TRANSACTIONS)
            .filter_eq("id", transaction_id.to_string())
            .fetch_one(self.store.as_ref())
            .await
        {
            Ok(record) => record,
            Err(QueryError::NotFound) => {
                return Err(LedgerError::TransactionNotFound { transaction_id })
            }
            Err(e) => return Err(e.into()),
        };
        let mut tx: WalletTransaction = typed(&record)?;

        if tx.status.is_terminal() {
            return Err(LedgerError::AlreadySettled { transaction_id });
        }

        if verdict == TransactionStatus::Success {
            let profile = fetch_profile(self.store.as_ref(), tx.user_id).await?;
            let new_balance = match tx.kind {
                TransactionKind::Deposit => profile.balance + tx.amount,
                TransactionKind::Withdrawal => {
                    if !profile.has_sufficient_balance(tx.amount) {
                        return Err(LedgerError::InsufficientBalance {
                            balance: profile.balance,
                            required: tx.amount,
                        });
                    }
                    profile.balance - tx.amount
                }
                // Transfers and adjustments settle at creation and never
                // reach this path while pending.
                _ => profile.balance,
            };
            set_balance(self.store.as_ref(), tx.user_id, new_balance).await?;
        }

        let mut patch = Record::new();
        patch.set(
            "status",
            serde_json::to_value(verdict).map_err(|e| StoreError::Serialization(e.to_string()))?,
        );
        Query::table(tables::TRANSACTIONS)
            .filter_eq("id", transaction_id.to_string())
            .update(patch)
            .fetch(self.store.as_ref())
            .await?;
        tx.status = verdict;
        tracing::info!(
            transaction_id = %transaction_id,
            verdict = ?verdict,
            "transaction settled"
        );

        let kind_word = match tx.kind {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
            _ => "Transaction",
        };
        let verdict_word = match verdict {
            TransactionStatus::Success => "approved",
            _ => "rejected",
        };
        notifications::push(
            self.store.as_ref(),
            tx.user_id,
            format!("{kind_word} of {} was {verdict_word}.", tx.amount),
        )
        .await?;

        Ok(tx)
    }
}
