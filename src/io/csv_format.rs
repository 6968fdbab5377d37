//! CSV format handling for account statements
//!
//! This module centralizes all CSV format concerns, providing:
//! - StatementRecord structure for (de)serialization
//! - Conversion from CSV records to domain types
//! - Statement serialization
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Format
//!
//! ```text
//! "Date","Description","Account Number","Balance","Type"
//! "15-01-2024","Holder name","NL24DHBN2018470578","€ 1.250,00","credit"
//! ```
//!
//! Every field is double-quoted, embedded quotes are doubled and every row
//! ends with `\n`.

use crate::types::{PortalError, Transaction, TransactionId, TransactionKind};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Header row of an exported statement
pub const STATEMENT_HEADERS: [&str; 5] = ["Date", "Description", "Account Number", "Balance", "Type"];

/// One statement row as it appears in the CSV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Account Number")]
    pub account: String,
    #[serde(rename = "Balance")]
    pub balance: String,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl From<&Transaction> for StatementRecord {
    fn from(tx: &Transaction) -> Self {
        StatementRecord {
            date: tx.date.clone(),
            description: tx.description.clone(),
            account: tx.account.clone(),
            balance: tx.balance.clone(),
            kind: tx.kind.to_string(),
        }
    }
}

/// Convert a StatementRecord to a Transaction
///
/// # Arguments
///
/// * `record` - The deserialized CSV row
/// * `id` - Position-based id to give the line
///
/// # Returns
///
/// * `Ok(Transaction)` - Successfully converted row
/// * `Err(PortalError::InvalidTransactionType)` - Type is not credit or debit
pub fn convert_statement_record(
    record: StatementRecord,
    id: TransactionId,
) -> Result<Transaction, PortalError> {
    let kind: TransactionKind = record.kind.parse()?;

    Ok(Transaction {
        id,
        date: record.date,
        description: record.description,
        account: record.account,
        balance: record.balance,
        kind,
    })
}

/// Write statement lines in CSV format
///
/// Writes the header followed by one row per transaction, in the given
/// order. The header is written explicitly so an empty statement still
/// gets one.
///
/// # Arguments
///
/// * `transactions` - Lines to write
/// * `output` - Writer receiving the CSV text
pub fn write_statement_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), PortalError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);

    writer.write_record(STATEMENT_HEADERS)?;
    for tx in transactions {
        writer.serialize(StatementRecord::from(tx))?;
    }
    writer.flush()?;

    Ok(())
}
