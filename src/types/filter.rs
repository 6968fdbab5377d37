//! Filter configuration for statement views
//!
//! Field names serialize in camelCase so a configuration can be stored next
//! to statement fixtures as JSON.

use super::error::PortalError;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Number of statement lines shown when no count is chosen
pub const DEFAULT_TRANSACTIONS_COUNT: usize = 5;

/// Amount as typed into a two-part (euros / cents) input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountInput {
    pub whole: String,
    pub decimal: String,
}

impl AmountInput {
    pub fn new(whole: &str, decimal: &str) -> Self {
        AmountInput {
            whole: whole.to_string(),
            decimal: decimal.to_string(),
        }
    }

    /// Both parts are empty
    pub fn is_blank(&self) -> bool {
        self.whole.trim().is_empty() && self.decimal.trim().is_empty()
    }

    /// Numeric value of the input
    ///
    /// A blank whole part means "no value" and yields `Ok(None)`. A blank
    /// decimal part counts as `00`.
    pub fn value(&self) -> Result<Option<Decimal>, PortalError> {
        let whole = self.whole.trim();
        if whole.is_empty() {
            return Ok(None);
        }
        let decimal = match self.decimal.trim() {
            "" => "00",
            d => d,
        };
        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !digits_only(whole) || !digits_only(decimal) {
            return Err(PortalError::invalid_amount(&format!("{}.{}", whole, decimal)));
        }
        Decimal::from_str(&format!("{}.{}", whole, decimal))
            .map(Some)
            .map_err(|_| PortalError::invalid_amount(&format!("{}.{}", whole, decimal)))
    }
}

impl FromStr for AmountInput {
    type Err = PortalError;

    /// Split `1250,50`, `1250.50` or `1250` into its two parts
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let input = match trimmed.rfind([',', '.']) {
            Some(pos) => AmountInput::new(&trimmed[..pos], &trimmed[pos + 1..]),
            None => AmountInput::new(trimmed, ""),
        };
        // Reject garbage up front rather than when the filter runs
        input.value()?;
        Ok(input)
    }
}

/// Time window selectable in the filter popup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodFilter {
    #[default]
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "6 month")]
    SixMonths,
}

impl PeriodFilter {
    /// Days before today still inside the window
    pub fn lookback_days(&self) -> i64 {
        match self {
            PeriodFilter::Today => 0,
            PeriodFilter::Week => 7,
            PeriodFilter::Month => 30,
            PeriodFilter::SixMonths => 182,
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(PeriodFilter::Today),
            "week" => Ok(PeriodFilter::Week),
            "month" => Ok(PeriodFilter::Month),
            "6 month" | "6-month" | "6-months" | "six-months" => Ok(PeriodFilter::SixMonths),
            _ => Err(PortalError::invalid_period(s)),
        }
    }
}

/// Filter settings of a statement view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(rename = "periodFilter")]
    pub period: PeriodFilter,
    #[serde(rename = "periodFilterEnabled")]
    pub period_enabled: bool,
    pub amount_filter: bool,
    pub min_amount: AmountInput,
    pub max_amount: AmountInput,
    /// Maximum number of lines kept; `None` keeps everything
    ///
    /// Accepts a number or its text form (`"5"`); `null`, `""` and `"all"`
    /// mean no cap.
    #[serde(deserialize_with = "deserialize_count")]
    pub transactions_count: Option<usize>,
    pub debit_transactions: bool,
    pub credit_transactions: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountField {
    Number(usize),
    Text(String),
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<CountField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(CountField::Number(count)) => Ok(Some(count)),
        Some(CountField::Text(text)) => {
            let text = text.trim();
            if text.is_empty() || text.eq_ignore_ascii_case("all") {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid transactions count '{text}'")))
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            period: PeriodFilter::Today,
            period_enabled: false,
            amount_filter: false,
            min_amount: AmountInput::default(),
            max_amount: AmountInput::default(),
            transactions_count: Some(DEFAULT_TRANSACTIONS_COUNT),
            debit_transactions: true,
            credit_transactions: true,
        }
    }
}

impl FilterConfig {
    /// Restore every field to its default
    pub fn reset(&mut self) {
        *self = FilterConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::whole_and_decimal("1250", "50", Some(Decimal::new(125050, 2)))]
    #[case::blank_decimal("900", "", Some(Decimal::new(90000, 2)))]
    #[case::blank_whole("", "50", None)]
    #[case::all_blank("", "", None)]
    #[case::padded(" 12 ", " 5 ", Some(Decimal::new(125, 1)))]
    fn test_amount_input_value(
        #[case] whole: &str,
        #[case] decimal: &str,
        #[case] expected: Option<Decimal>,
    ) {
        assert_eq!(AmountInput::new(whole, decimal).value().unwrap(), expected);
    }

    #[rstest]
    #[case("12a", "")]
    #[case("12", "x5")]
    #[case("-5", "00")]
    fn test_amount_input_value_rejects_non_digits(#[case] whole: &str, #[case] decimal: &str) {
        assert!(AmountInput::new(whole, decimal).value().is_err());
    }

    #[rstest]
    #[case("1250,50", "1250", "50")]
    #[case("1250.50", "1250", "50")]
    #[case("300", "300", "")]
    fn test_amount_input_from_str(#[case] input: &str, #[case] whole: &str, #[case] decimal: &str) {
        assert_eq!(
            input.parse::<AmountInput>().unwrap(),
            AmountInput::new(whole, decimal)
        );
    }

    #[test]
    fn test_amount_input_from_str_rejects_garbage() {
        assert!("twelve".parse::<AmountInput>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert!(config.debit_transactions);
        assert!(config.credit_transactions);
        assert!(!config.amount_filter);
        assert!(!config.period_enabled);
        assert_eq!(config.transactions_count, Some(5));
    }

    #[test]
    fn test_config_from_json_uses_defaults_for_missing_fields() {
        let json = r#"{
            "amountFilter": true,
            "minAmount": { "whole": "100" },
            "creditTransactions": false,
            "periodFilter": "6 month"
        }"#;
        let config: FilterConfig = serde_json::from_str(json).unwrap();

        assert!(config.amount_filter);
        assert_eq!(config.min_amount, AmountInput::new("100", ""));
        assert_eq!(config.max_amount, AmountInput::default());
        assert!(!config.credit_transactions);
        assert!(config.debit_transactions);
        assert_eq!(config.period, PeriodFilter::SixMonths);
        assert_eq!(config.transactions_count, Some(5));
    }

    #[rstest]
    #[case::number(r#"{"transactionsCount": 10}"#, Some(10))]
    #[case::text(r#"{"transactionsCount": "20"}"#, Some(20))]
    #[case::padded_text(r#"{"transactionsCount": " 30 "}"#, Some(30))]
    #[case::null(r#"{"transactionsCount": null}"#, None)]
    #[case::blank(r#"{"transactionsCount": ""}"#, None)]
    #[case::all(r#"{"transactionsCount": "all"}"#, None)]
    #[case::missing(r#"{}"#, Some(5))]
    fn test_transactions_count_forms(#[case] json: &str, #[case] expected: Option<usize>) {
        let config: FilterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.transactions_count, expected);
    }

    #[test]
    fn test_transactions_count_rejects_words() {
        let result = serde_json::from_str::<FilterConfig>(r#"{"transactionsCount": "five"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut config = FilterConfig {
            amount_filter: true,
            transactions_count: None,
            ..FilterConfig::default()
        };
        config.reset();
        assert_eq!(config, FilterConfig::default());
    }

    #[rstest]
    #[case("today", PeriodFilter::Today)]
    #[case("Week", PeriodFilter::Week)]
    #[case("6 month", PeriodFilter::SixMonths)]
    #[case("6-months", PeriodFilter::SixMonths)]
    fn test_period_from_str(#[case] input: &str, #[case] expected: PeriodFilter) {
        assert_eq!(input.parse::<PeriodFilter>().unwrap(), expected);
    }
}
