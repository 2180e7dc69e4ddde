//! Logical table names.
//!
//! Every component addresses tables through these constants so a rename
//! stays a one-line change.

/// User profiles, keyed by `id` (UUID string).
pub const PROFILES: &str = "profiles";

/// Ledger transactions, keyed by `id` (ULID string).
pub const TRANSACTIONS: &str = "transactions";

/// Per-user notifications, keyed by `id` (UUID string).
pub const NOTIFICATIONS: &str = "notifications";

/// Company bank accounts offered as deposit destinations.
pub const COMPANY_BANK_INFO: &str = "company_bank_info";
