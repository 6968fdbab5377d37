//! Response bodies of the portal API
//!
//! Endpoints answer either with the bare payload or with an envelope
//! `{ "success": true, "data": ..., "timestamp": "..." }`. Both decode to the
//! same payload through [`decode_payload`].

use crate::core::balance::format_display_amount;
use crate::types::{PortalError, Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope {
        success: bool,
        data: T,
        #[serde(default)]
        #[allow(dead_code)]
        timestamp: Option<String>,
    },
    Raw(T),
}

/// Error body of a failed request: `{ "error": { "message": ... } }`
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// Decode a response body that may or may not be wrapped in an envelope
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, PortalError> {
    match serde_json::from_str::<Payload<T>>(body)? {
        Payload::Envelope {
            success: false, ..
        } => Err(PortalError::Api {
            status: 200,
            message: "request was not successful".to_string(),
        }),
        Payload::Envelope { data, .. } | Payload::Raw(data) => Ok(data),
    }
}

/// Message for a failed request, taken from its body when there is one
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

/// One page of an account statement
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPage {
    pub account_number: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub currency_code: String,
    pub transactions: Vec<StatementLine>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub transaction_date: String,
    #[serde(default)]
    pub value_date: String,
    pub description: String,
    /// Signed amount; negative for money leaving the account
    pub amount: Decimal,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: u32,
    pub total_records: u32,
    pub total_pages: u32,
}

impl StatementPage {
    /// Turn the page into display lines for the account `iban`
    ///
    /// Lines are numbered by position. A line with an unknown type is
    /// skipped; the numbering of the lines after it is unaffected.
    pub fn into_transactions(self, iban: &str) -> Vec<Transaction> {
        self.transactions
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| match line.kind.parse::<TransactionKind>() {
                Ok(kind) => Some(Transaction::new(
                    index as u64 + 1,
                    &line.transaction_date,
                    &line.description,
                    iban,
                    &format_display_amount(line.amount),
                    kind,
                )),
                Err(e) => {
                    tracing::warn!("Skipping statement line {}: {}", index + 1, e);
                    None
                }
            })
            .collect()
    }
}

/// Holder details returned for an IBAN lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountByIban {
    pub holder_name: String,
    pub institution_name: String,
    pub bic: String,
    pub customer_number: String,
    pub support_reg_number: String,
    pub support_packages: String,
    pub email: String,
}

/// Answer to a current-password check
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordValidation {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    pub count: u32,
}
