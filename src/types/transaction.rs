//! Transaction types for account statements
//!
//! Transactions are display records: the date, account and balance are kept
//! as the strings shown to the customer, exactly as the statement view
//! receives them after API transformation.

use super::error::PortalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction identifier
///
/// Statement lines are numbered by position (1-based) when loaded.
pub type TransactionId = u64;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received on the account
    Credit,

    /// Money leaving the account
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = PortalError;

    /// Parse a transaction type, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            _ => Err(PortalError::invalid_transaction_type(s)),
        }
    }
}

/// A single statement line as displayed to the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position-based identifier
    pub id: TransactionId,

    /// Locale-formatted booking date, e.g. `15-01-2024`
    pub date: String,

    /// Free-text description or counterparty name
    pub description: String,

    /// IBAN display string of the account
    pub account: String,

    /// Signed amount with currency symbol, e.g. `€ 1.250,00` or `- € 500,00`
    pub balance: String,

    /// Credit or debit
    ///
    /// This field decides type filtering. The sign inside `balance` is only
    /// checked for consistency when a statement is loaded.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        date: &str,
        description: &str,
        account: &str,
        balance: &str,
        kind: TransactionKind,
    ) -> Self {
        Transaction {
            id,
            date: date.to_string(),
            description: description.to_string(),
            account: account.to_string(),
            balance: balance.to_string(),
            kind,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionKind::Debit
    }
}
