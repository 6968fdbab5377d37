//! Display amount parsing and formatting
//!
//! Statement balances arrive as display strings such as `€ 1.250,00`,
//! `- € 500,00` or `-€ 900.00`. This module turns them back into numbers for
//! amount filtering and formats numbers the way statement lines show them.
//!
//! # Parsing rules
//!
//! - A `-` anywhere in the string marks the amount as negative
//! - `€`, whitespace and `-` are stripped
//! - If a comma is present the string is European formatted: dots are
//!   thousand separators and the comma is the decimal separator
//! - Without a comma a dot is the decimal separator
//!
//! Anything that does not parse as a plain decimal afterwards yields `None`.
//! Callers treat `None` as "fails every comparison".

use crate::types::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a display balance into a signed amount
pub fn parse_display_amount(display: &str) -> Option<Decimal> {
    let negative = display.contains('-');

    let mut cleaned: String = display
        .chars()
        .filter(|c| *c != '€' && *c != '-' && !c.is_whitespace())
        .collect();

    if cleaned.contains(',') {
        cleaned = cleaned.replace('.', "").replacen(',', ".", 1);
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

/// Parse a display balance and drop its sign
pub fn absolute_amount(display: &str) -> Option<Decimal> {
    parse_display_amount(display).map(|value| value.abs())
}

/// Format an amount as a European display balance
///
/// `1250` becomes `€ 1.250,00`, `-500` becomes `- € 500,00`.
pub fn format_display_amount(amount: Decimal) -> String {
    let rounded = amount.abs().round_dp(2);
    let plain = format!("{:.2}", rounded);
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if amount.is_sign_negative() && !rounded.is_zero() {
        format!("- € {},{}", grouped, frac_part)
    } else {
        format!("€ {},{}", grouped, frac_part)
    }
}

/// Whether the sign inside `balance` contradicts the transaction type
///
/// Unparseable balances and zero amounts never count as a contradiction.
pub fn sign_disagrees(transaction: &Transaction) -> bool {
    match parse_display_amount(&transaction.balance) {
        Some(value) if value.is_zero() => false,
        Some(value) => match transaction.kind {
            TransactionKind::Credit => value.is_sign_negative(),
            TransactionKind::Debit => !value.is_sign_negative(),
        },
        None => false,
    }
}
