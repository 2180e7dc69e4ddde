//! User-initiated wallet operations.

use std::sync::Arc;

use meridian_core::{
    tables, CompanyBankAccount, Query, TableStore, UserId, UserProfile, WalletTransaction,
};

use crate::error::LedgerError;
use crate::notifications;
use crate::support::{fetch_profile, insert_transactions, set_balance, typed};

/// Wallet operations for a signed-in member.
///
/// Deposit and withdrawal requests create `PENDING` ledger entries and touch
/// no balance; the balance moves when an administrator settles them.
/// Transfers between members settle immediately.
pub struct Wallet<S> {
    store: Arc<S>,
}

impl<S: TableStore> Wallet<S> {
    /// Create wallet operations over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The user's current balance.
    ///
    /// # Errors
    ///
    /// Fails with [`LedgerError::ProfileNotFound`] for an unknown user, or
    /// on storage faults.
    pub async fn balance(&self, user_id: UserId) -> Result<i64, LedgerError> {
        Ok(fetch_profile(self.store.as_ref(), user_id).await?.balance)
    }

    /// The company bank accounts offered as deposit destinations.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn company_banks(&self) -> Result<Vec<CompanyBankAccount>, LedgerError> {
        let rows = Query::table(tables::COMPANY_BANK_INFO)
            .fetch(self.store.as_ref())
            .await?;
        rows.iter().map(typed).collect()
    }

    /// Record a pending deposit request against a company bank account.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] for a non-positive amount.
    /// - [`LedgerError::ProfileNotFound`] for an unknown user.
    pub async fn request_deposit(
        &self,
        user_id: UserId,
        amount: i64,
        destination: &CompanyBankAccount,
    ) -> Result<WalletTransaction, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        fetch_profile(self.store.as_ref(), user_id).await?;

        let tx = WalletTransaction::deposit(user_id, amount, destination);
        insert_transactions(self.store.as_ref(), &[tx.clone()]).await?;
        tracing::info!(user_id = %user_id, transaction_id = %tx.id, amount, "deposit requested");

        notifications::push(
            self.store.as_ref(),
            user_id,
            format!("Deposit request of {amount} received and awaiting confirmation."),
        )
        .await?;

        Ok(tx)
    }

    /// Record a pending withdrawal request to the user's own bank account.
    ///
    /// The balance is checked at request time but debited at settlement; the
    /// window between the two can race with other wallet activity.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] for a non-positive amount.
    /// - [`LedgerError::InsufficientBalance`] when the balance does not
    ///   cover the amount at request time.
    /// - [`LedgerError::ProfileNotFound`] for an unknown user.
    pub async fn request_withdrawal(
        &self,
        user_id: UserId,
        amount: i64,
        bank_name: &str,
        account_number: &str,
        account_holder_name: &str,
    ) -> Result<WalletTransaction, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let profile = fetch_profile(self.store.as_ref(), user_id).await?;
        if !profile.has_sufficient_balance(amount) {
            return Err(LedgerError::InsufficientBalance {
                balance: profile.balance,
                required: amount,
            });
        }

        let tx = WalletTransaction::withdrawal(
            user_id,
            amount,
            bank_name,
            account_number,
            account_holder_name,
        );
        insert_transactions(self.store.as_ref(), &[tx.clone()]).await?;
        tracing::info!(user_id = %user_id, transaction_id = %tx.id, amount, "withdrawal requested");

        notifications::push(
            self.store.as_ref(),
            user_id,
            format!("Withdrawal request of {amount} received and awaiting confirmation."),
        )
        .await?;

        Ok(tx)
    }

    /// Transfer between member wallets, settling immediately.
    ///
    /// The recipient resolves by username first, then by email. Returns the
    /// recorded (outgoing, incoming) pair.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] for a non-positive amount.
    /// - [`LedgerError::RecipientNotFound`] when neither lookup resolves.
    /// - [`LedgerError::SelfTransfer`] when the recipient is the sender.
    /// - [`LedgerError::InsufficientBalance`] when the sender cannot cover
    ///   the amount.
    pub async fn transfer(
        &self,
        from: UserId,
        recipient: &str,
        amount: i64,
    ) -> Result<(WalletTransaction, WalletTransaction), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let sender = fetch_profile(self.store.as_ref(), from).await?;
        let recipient = self.resolve_recipient(recipient).await?;
        if recipient.id == sender.id {
            return Err(LedgerError::SelfTransfer);
        }
        if !sender.has_sufficient_balance(amount) {
            return Err(LedgerError::InsufficientBalance {
                balance: sender.balance,
                required: amount,
            });
        }

        set_balance(self.store.as_ref(), sender.id, sender.balance - amount).await?;
        set_balance(self.store.as_ref(), recipient.id, recipient.balance + amount).await?;

        let (outgoing, incoming) = WalletTransaction::transfer_pair(sender.id, recipient.id, amount);
        insert_transactions(self.store.as_ref(), &[outgoing.clone(), incoming.clone()]).await?;
        tracing::info!(
            from = %sender.id,
            to = %recipient.id,
            amount,
            "transfer settled"
        );

        notifications::push(
            self.store.as_ref(),
            sender.id,
            format!("You sent {amount} to {}.", recipient.username),
        )
        .await?;
        notifications::push(
            self.store.as_ref(),
            recipient.id,
            format!("You received {amount} from {}.", sender.username),
        )
        .await?;

        Ok((outgoing, incoming))
    }

    /// The user's ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn transactions(&self, user_id: UserId) -> Result<Vec<WalletTransaction>, LedgerError> {
        // ULID ids are time-ordered, so sorting on the id is chronological.
        let rows = Query::table(tables::TRANSACTIONS)
            .filter_eq("user_id", user_id.to_string())
            .sort_by("id", false)
            .fetch(self.store.as_ref())
            .await?;
        rows.iter().map(typed).collect()
    }

    async fn resolve_recipient(&self, identifier: &str) -> Result<UserProfile, LedgerError> {
        for column in ["username", "email"] {
            let rows = Query::table(tables::PROFILES)
                .filter_eq(column, identifier)
                .limit(1)
                .fetch(self.store.as_ref())
                .await?;
            if let Some(record) = rows.first() {
                return typed(record);
            }
        }
        Err(LedgerError::RecipientNotFound {
            identifier: identifier.to_string(),
        })
    }
}
