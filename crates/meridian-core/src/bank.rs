//! Company bank account view over the `company_bank_info` table.

use serde::{Deserialize, Serialize};

use crate::ids::BankId;

/// A company-owned bank account offered as a deposit destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBankAccount {
    /// The bank account id.
    pub id: BankId,

    /// Bank display name.
    pub bank_name: String,

    /// Account number at that bank.
    pub account_number: String,

    /// Registered account holder.
    pub account_holder_name: String,
}
