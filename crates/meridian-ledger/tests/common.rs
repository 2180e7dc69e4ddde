//! Common test utilities for ledger integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use meridian_core::{CompanyBankAccount, UserId};
use meridian_ledger::{AdminDesk, Wallet};
use meridian_store::{seed, MemoryStore};

/// Test harness over a fresh seeded scope.
pub struct TestHarness {
    /// The shared store scope.
    pub store: Arc<MemoryStore>,
    /// Member wallet operations.
    pub wallet: Wallet<MemoryStore>,
    /// Administrative operations.
    pub admin: AdminDesk<MemoryStore>,
    /// Seed member with balance 50,000,000.
    pub member: UserId,
    /// Seed member with balance 20,000,000.
    pub other_member: UserId,
}

impl TestHarness {
    /// Create a harness over a fresh in-memory scope.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            wallet: Wallet::new(Arc::clone(&store)),
            admin: AdminDesk::new(Arc::clone(&store)),
            member: seed::MEMBER_DEMO_USER_ID,
            other_member: seed::TEST_MEMBER_USER_ID,
            store,
        }
    }

    /// The first seeded company bank account.
    pub async fn company_bank(&self) -> CompanyBankAccount {
        self.wallet
            .company_banks()
            .await
            .expect("seeded bank list")
            .into_iter()
            .next()
            .expect("at least one company bank")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
