//! Predefined seed content for first-access table initialization.
//!
//! A table listed here is materialized with these rows the first time it is
//! read in a fresh storage scope. Tables not listed read as empty and are
//! never materialized.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use uuid::uuid;

use meridian_core::{tables, BankId, CompanyBankAccount, Record, UserId, UserProfile};

/// Seed account: platform administrator.
pub const ADMIN_USER_ID: UserId = UserId::from_uuid(uuid!("6f9d2b1e-3c47-4a85-9b12-8f3e6a7c5d10"));

/// Seed account: long-standing member.
pub const AMBOALI_USER_ID: UserId =
    UserId::from_uuid(uuid!("2a7c4e91-6b3d-4f28-8c55-1d9e7b4a6f21"));

/// Seed account: demo member.
pub const MEMBER_DEMO_USER_ID: UserId =
    UserId::from_uuid(uuid!("4e1b8d37-9f62-4c04-a3b8-7c2d5e9f1a32"));

/// Seed account: test member.
pub const TEST_MEMBER_USER_ID: UserId =
    UserId::from_uuid(uuid!("8c5a3f19-2e7b-4d96-b471-6a8d4c2e9b43"));

/// The seed content for `table`, if the table has any.
#[must_use]
pub fn seed_rows(table: &str) -> Option<Vec<Record>> {
    match table {
        tables::PROFILES => Some(typed_rows(&seed_profiles())),
        tables::COMPANY_BANK_INFO => Some(typed_rows(&seed_company_banks())),
        // Ledger tables start out empty but are still materialized, so a
        // fresh scope persists them on first read.
        tables::TRANSACTIONS | tables::NOTIFICATIONS => Some(Vec::new()),
        _ => None,
    }
}

/// The initial account set for a fresh scope.
#[must_use]
pub fn seed_profiles() -> Vec<UserProfile> {
    vec![
        profile(
            ADMIN_USER_ID,
            "panggilajabryan@gmail.com",
            "Admin User",
            "admin",
            "081234567890",
            true,
            1_000_000_000,
            seed_time(1),
        ),
        profile(
            AMBOALI_USER_ID,
            "amboali89@gmail.com",
            "Amboali 89",
            "amboali89",
            "08987654321",
            false,
            13_000_000,
            seed_time(2),
        ),
        profile(
            MEMBER_DEMO_USER_ID,
            "member@gmail.com",
            "Member Demo",
            "memberdemo",
            "08111222333",
            false,
            50_000_000,
            seed_time(3),
        ),
        profile(
            TEST_MEMBER_USER_ID,
            "test@member.com",
            "Test Member 20Jt",
            "test20jt",
            "081222333444",
            false,
            20_000_000,
            seed_time(4),
        ),
    ]
}

/// The company bank accounts offered as deposit destinations.
#[must_use]
pub fn seed_company_banks() -> Vec<CompanyBankAccount> {
    vec![
        bank(
            uuid!("d1f4b8a2-6c3e-4957-8e1a-2b9d7f5c3e51"),
            "Bank Central Asia (BCA)",
            "1234567890",
            "PT Meridian Kapital",
        ),
        bank(
            uuid!("e2a5c9b3-7d4f-4068-9f2b-3c1e8a6d4f62"),
            "Bank Mandiri",
            "0987654321",
            "PT Meridian Kapital",
        ),
        bank(
            uuid!("f3b6d1c4-8e5a-4179-a03c-4d2f9b7e5a73"),
            "BNI",
            "1891316499",
            "PT Meridian Kapital",
        ),
        bank(
            uuid!("a4c7e2d5-9f6b-4280-b14d-5e3a1c8f6b84"),
            "BRI",
            "0521010299",
            "PT Meridian Kapital",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: UserId,
    email: &str,
    full_name: &str,
    username: &str,
    phone_number: &str,
    is_admin: bool,
    balance: i64,
    created_at: DateTime<Utc>,
) -> UserProfile {
    let mut profile = UserProfile::new(id, email, full_name, username, phone_number);
    profile.is_admin = is_admin;
    profile.is_verified = true;
    profile.balance = balance;
    profile.created_at = created_at;
    profile
}

fn bank(id: uuid::Uuid, bank_name: &str, account_number: &str, holder: &str) -> CompanyBankAccount {
    CompanyBankAccount {
        id: BankId::from_uuid(id),
        bank_name: bank_name.into(),
        account_number: account_number.into(),
        account_holder_name: holder.into(),
    }
}

/// Deterministic creation timestamps so seeded listings order stably.
fn seed_time(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .expect("valid seed timestamp")
}

fn typed_rows<T: Serialize>(items: &[T]) -> Vec<Record> {
    items
        .iter()
        .map(|item| Record::from_typed(item).expect("seed rows serialize to JSON objects"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profiles_seed_contains_the_demo_member() {
        let rows = seed_rows(tables::PROFILES).unwrap();
        let member = rows
            .iter()
            .find(|r| r.get("email") == Some(&json!("member@gmail.com")))
            .unwrap();
        assert_eq!(member.get("is_admin"), Some(&json!(false)));
        assert_eq!(member.get("balance"), Some(&json!(50_000_000)));
    }

    #[test]
    fn exactly_one_seed_admin() {
        let admins = seed_profiles().iter().filter(|p| p.is_admin).count();
        assert_eq!(admins, 1);
    }

    #[test]
    fn ledger_tables_seed_empty() {
        assert_eq!(seed_rows(tables::TRANSACTIONS), Some(Vec::new()));
        assert_eq!(seed_rows(tables::NOTIFICATIONS), Some(Vec::new()));
    }

    #[test]
    fn unknown_tables_have_no_seed() {
        assert!(seed_rows("audit_log").is_none());
    }

    #[test]
    fn seed_rows_carry_ids() {
        for table in [tables::PROFILES, tables::COMPANY_BANK_INFO] {
            for row in seed_rows(table).unwrap() {
                assert!(row.id().is_some());
            }
        }
    }
}
