//! Statement filter engine
//!
//! Turns a base transaction sequence plus a [`FilterConfig`] into the
//! sequence a statement view displays. Filtering runs in four stages:
//!
//! 1. **Type** - keep credits, debits, both or nothing
//! 2. **Amount** - keep lines whose absolute amount is within `[min, max]`
//! 3. **Period** - keep lines booked inside the selected window
//! 4. **Count** - keep the first N lines
//!
//! Order is preserved; nothing is re-sorted. The engine never fails: lines
//! whose balance or date cannot be parsed are dropped from the stages that
//! need them.

use crate::core::balance::absolute_amount;
use crate::types::{FilterConfig, Transaction};
use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;

/// Date layouts accepted on statement lines
const DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Parse a statement date in any of the supported layouts
pub fn parse_display_date(display: &str) -> Option<NaiveDate> {
    let trimmed = display.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Inclusive amount bounds resolved from the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
enum AmountBounds {
    /// `max` of `None` means unbounded
    Range { min: Decimal, max: Option<Decimal> },
    /// A bound could not be parsed, so no line can satisfy it
    Unsatisfiable,
}

impl AmountBounds {
    fn contains(&self, value: Decimal) -> bool {
        match self {
            AmountBounds::Range { min, max } => {
                value >= *min && max.map_or(true, |max| value <= max)
            }
            AmountBounds::Unsatisfiable => false,
        }
    }
}

/// Filter engine bound to one configuration and one "today"
#[derive(Debug, Clone)]
pub struct FilterEngine {
    config: FilterConfig,
    today: NaiveDate,
}

impl FilterEngine {
    /// Create an engine that evaluates periods against the local date
    pub fn new(config: FilterConfig) -> Self {
        FilterEngine {
            config,
            today: Local::now().date_naive(),
        }
    }

    /// Evaluate period windows against a fixed date instead
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Apply every enabled stage to `base`
    ///
    /// # Arguments
    ///
    /// * `base` - The full statement in display order
    ///
    /// # Returns
    ///
    /// A new vector holding the retained lines in their original order.
    pub fn apply(&self, base: &[Transaction]) -> Vec<Transaction> {
        let config = &self.config;

        if !config.debit_transactions && !config.credit_transactions {
            return Vec::new();
        }

        let bounds = if config.amount_filter {
            Some(self.amount_bounds())
        } else {
            None
        };

        let retained = base
            .iter()
            .filter(|tx| self.passes_type(tx))
            .filter(|tx| bounds.map_or(true, |bounds| Self::passes_amount(tx, &bounds)))
            .filter(|tx| !config.period_enabled || self.passes_period(tx));

        match config.transactions_count {
            Some(count) => retained.take(count).cloned().collect(),
            None => retained.cloned().collect(),
        }
    }

    fn passes_type(&self, tx: &Transaction) -> bool {
        match (self.config.debit_transactions, self.config.credit_transactions) {
            (true, true) => true,
            (true, false) => tx.is_debit(),
            (false, true) => tx.is_credit(),
            (false, false) => false,
        }
    }

    fn amount_bounds(&self) -> AmountBounds {
        let min = self.config.min_amount.value();
        let max = self.config.max_amount.value();

        match (min, max) {
            (Ok(min), Ok(max)) => AmountBounds::Range {
                min: min.unwrap_or(Decimal::ZERO),
                max,
            },
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Amount filter matches nothing: {}", e);
                AmountBounds::Unsatisfiable
            }
        }
    }

    fn passes_amount(tx: &Transaction, bounds: &AmountBounds) -> bool {
        match absolute_amount(&tx.balance) {
            Some(value) => bounds.contains(value),
            None => {
                tracing::debug!(
                    "Dropping transaction {} from amount filter: unparseable balance '{}'",
                    tx.id,
                    tx.balance
                );
                false
            }
        }
    }

    fn passes_period(&self, tx: &Transaction) -> bool {
        let Some(date) = parse_display_date(&tx.date) else {
            tracing::debug!(
                "Dropping transaction {} from period filter: unparseable date '{}'",
                tx.id,
                tx.date
            );
            return false;
        };
        let earliest = self.today - Duration::days(self.config.period.lookback_days());
        date >= earliest && date <= self.today
    }
}

/// Filter `base` with `config`, evaluating periods against the local date
pub fn apply_filters(base: &[Transaction], config: &FilterConfig) -> Vec<Transaction> {
    FilterEngine::new(config.clone()).apply(base)
}
