//! Integration tests for the administrative console operations.

mod common;

use common::TestHarness;

use meridian_core::{TransactionKind, TransactionStatus};
use meridian_ledger::{Adjustment, CreateUserRequest, LedgerError, ProfileUpdate};

fn create_request(email: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: email.into(),
        full_name: "Created Trader".into(),
        username: None,
        phone_number: "0811999888".into(),
        is_admin: false,
        is_verified: true,
        balance: 250_000,
    }
}

#[tokio::test]
async fn create_user_with_opening_balance() {
    let h = TestHarness::new();

    let profile = h
        .admin
        .create_user(create_request("created@example.com"))
        .await
        .unwrap();
    assert_eq!(profile.username, "created");
    assert_eq!(profile.balance, 250_000);
    assert!(profile.is_verified);

    assert_eq!(h.wallet.balance(profile.id).await.unwrap(), 250_000);

    // Newest first: the created account leads the listing.
    let users = h.admin.list_users().await.unwrap();
    assert_eq!(users.first().map(|u| u.id), Some(profile.id));
    assert_eq!(users.len(), 5);
}

#[tokio::test]
async fn create_user_rejects_taken_email() {
    let h = TestHarness::new();
    let result = h.admin.create_user(create_request("member@gmail.com")).await;
    assert!(matches!(result, Err(LedgerError::EmailTaken { .. })));
}

#[tokio::test]
async fn adjust_balance_both_directions_with_ledger_entries() {
    let h = TestHarness::new();

    let credited = h
        .admin
        .adjust_balance(h.member, 1_000_000, Adjustment::Credit)
        .await
        .unwrap();
    assert_eq!(credited, 51_000_000);

    let debited = h
        .admin
        .adjust_balance(h.member, 500_000, Adjustment::Debit)
        .await
        .unwrap();
    assert_eq!(debited, 50_500_000);

    let txs = h.wallet.transactions(h.member).await.unwrap();
    let adjustments: Vec<_> = txs
        .iter()
        .filter(|t| t.kind == TransactionKind::Adjustment)
        .collect();
    assert_eq!(adjustments.len(), 2);
    // Newest first: the debit leads, carrying a signed delta.
    assert_eq!(adjustments[0].amount, -500_000);
    assert_eq!(adjustments[1].amount, 1_000_000);
    assert!(adjustments
        .iter()
        .all(|t| t.status == TransactionStatus::Success));
}

#[tokio::test]
async fn debit_may_drive_the_balance_negative() {
    let h = TestHarness::new();
    let balance = h
        .admin
        .adjust_balance(h.member, 60_000_000, Adjustment::Debit)
        .await
        .unwrap();
    assert_eq!(balance, -10_000_000);
}

#[tokio::test]
async fn adjustment_amount_must_be_positive() {
    let h = TestHarness::new();
    let result = h
        .admin
        .adjust_balance(h.member, -5, Adjustment::Credit)
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidAmount(-5))));
}

#[tokio::test]
async fn toggle_user_active_flag() {
    let h = TestHarness::new();

    h.admin.set_user_active(h.member, false).await.unwrap();
    let users = h.admin.list_users().await.unwrap();
    let member = users.iter().find(|u| u.id == h.member).unwrap();
    assert!(!member.is_verified);

    h.admin.set_user_active(h.member, true).await.unwrap();
    let users = h.admin.list_users().await.unwrap();
    let member = users.iter().find(|u| u.id == h.member).unwrap();
    assert!(member.is_verified);
}

#[tokio::test]
async fn partial_profile_update_leaves_other_fields() {
    let h = TestHarness::new();

    h.admin
        .update_user(
            h.member,
            ProfileUpdate {
                full_name: Some("Renamed Member".into()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    let users = h.admin.list_users().await.unwrap();
    let member = users.iter().find(|u| u.id == h.member).unwrap();
    assert_eq!(member.full_name, "Renamed Member");
    assert_eq!(member.email, "member@gmail.com");
    assert_eq!(member.balance, 50_000_000);

    // An empty update is a no-op, not an error.
    h.admin
        .update_user(h.member, ProfileUpdate::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn pending_listing_tracks_settlement() {
    let h = TestHarness::new();
    let bank = h.company_bank().await;

    let tx1 = h
        .wallet
        .request_deposit(h.member, 100, &bank)
        .await
        .unwrap();
    let tx2 = h
        .wallet
        .request_deposit(h.other_member, 200, &bank)
        .await
        .unwrap();

    assert_eq!(h.admin.pending_transactions().await.unwrap().len(), 2);

    h.admin
        .settle_transaction(tx1.id, TransactionStatus::Success)
        .await
        .unwrap();

    let pending = h.admin.pending_transactions().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, tx2.id);

    // The full ledger still lists both.
    assert_eq!(h.admin.list_transactions().await.unwrap().len(), 2);
}

#[tokio::test]
async fn settling_an_unknown_transaction_fails() {
    let h = TestHarness::new();
    let result = h
        .admin
        .settle_transaction(
            meridian_core::TransactionId::generate(),
            TransactionStatus::Success,
        )
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::TransactionNotFound { .. })
    ));
}
