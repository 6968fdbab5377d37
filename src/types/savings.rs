//! Savings product types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-term savings product lines offered in the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavingsProduct {
    /// Fixed rate deposit, 3 months up to 5 years
    MaxiSpaar,

    /// Euribor-linked deposit with a guaranteed base rate
    SolidExtra,

    /// Notice account with 33, 66 or 99 days notice
    CombiSpaar,
}

impl SavingsProduct {
    pub const ALL: [SavingsProduct; 3] = [
        SavingsProduct::MaxiSpaar,
        SavingsProduct::SolidExtra,
        SavingsProduct::CombiSpaar,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SavingsProduct::MaxiSpaar => "DHB MaxiSpaar",
            SavingsProduct::SolidExtra => "DHB SolidExtra",
            SavingsProduct::CombiSpaar => "DHB CombiSpaar",
        }
    }

    /// Path segment of the product's API endpoints
    pub fn api_slug(&self) -> &'static str {
        match self {
            SavingsProduct::MaxiSpaar => "maxispaar",
            SavingsProduct::SolidExtra => "solidextra",
            SavingsProduct::CombiSpaar => "combispaar",
        }
    }
}

impl fmt::Display for SavingsProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One selectable term of a savings product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsOption {
    pub id: String,
    pub term: String,
    /// Rate as displayed, e.g. `1,85%` or `3 months Euribor + 0.05%`
    pub interest: String,
    /// Fixed yearly rate in percent; `None` for variable rates
    #[serde(default)]
    pub rate: Option<Decimal>,
    pub valid_from: String,
    pub balance_class: String,
    /// Term length in days
    pub days: u32,
}

/// Account the customer can pay in from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IbanOption {
    pub iban: String,
    pub account_name: String,
    pub balance: String,
}
