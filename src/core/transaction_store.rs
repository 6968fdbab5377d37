//! Transaction storage for statement views
//!
//! This module provides the TransactionStore component that holds the lines
//! of one statement view. Two sequences are kept:
//!
//! - `base` - everything loaded for the account, in display order
//! - `displayed` - the result of the last filter run over `base`
//!
//! Sequences are replaced wholesale, never edited in place. The one exception
//! is [`TransactionStore::prepend`], used when a transfer books a new line;
//! it also drops the active filter so the new line is visible.

use crate::core::balance::sign_disagrees;
use crate::core::filter_engine::FilterEngine;
use crate::types::{Transaction, TransactionKind};
use std::fmt;

/// Account number shown on the built-in statement lines
pub const FALLBACK_ACCOUNT: &str = "NL24DHBN2018470578";

/// Where the lines of a statement came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementSource {
    /// Fetched from the portal API
    Api,
    /// Built-in lines used when the API could not be reached
    Fallback,
    /// Read from a local CSV file
    Local,
}

impl fmt::Display for StatementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementSource::Api => "api",
            StatementSource::Fallback => "fallback",
            StatementSource::Local => "local",
        })
    }
}

/// Statement lines of one account view
#[derive(Debug, Clone)]
pub struct TransactionStore {
    base: Vec<Transaction>,
    displayed: Vec<Transaction>,
    source: StatementSource,
}

impl TransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        TransactionStore {
            base: Vec::new(),
            displayed: Vec::new(),
            source: StatementSource::Fallback,
        }
    }

    /// Replace the statement with freshly loaded lines
    ///
    /// The displayed sequence is reset to the full base sequence. Lines whose
    /// balance sign contradicts their type are kept but logged.
    ///
    /// # Arguments
    ///
    /// * `base` - Lines in display order
    /// * `source` - Where the lines came from
    pub fn load(&mut self, base: Vec<Transaction>, source: StatementSource) {
        for tx in base.iter().filter(|tx| sign_disagrees(tx)) {
            tracing::warn!(
                "Transaction {} is marked {} but its balance reads '{}'",
                tx.id,
                tx.kind,
                tx.balance
            );
        }

        tracing::debug!("Loaded {} statement lines from {}", base.len(), source);
        self.displayed = base.clone();
        self.base = base;
        self.source = source;
    }

    /// Recompute the displayed sequence with `engine`
    pub fn apply(&mut self, engine: &FilterEngine) -> &[Transaction] {
        self.displayed = engine.apply(&self.base);
        &self.displayed
    }

    /// Show the whole base sequence again
    pub fn clear_filter(&mut self) {
        self.displayed = self.base.clone();
    }

    /// Put a newly booked line at the top of the statement
    ///
    /// The active filter is cleared so the line shows up immediately.
    pub fn prepend(&mut self, tx: Transaction) {
        self.base.insert(0, tx);
        self.clear_filter();
    }

    /// Next free id for a line added on top of the loaded ones
    pub fn next_id(&self) -> u64 {
        self.base.iter().map(|tx| tx.id).max().unwrap_or(0) + 1
    }

    pub fn base(&self) -> &[Transaction] {
        &self.base
    }

    pub fn displayed(&self) -> &[Transaction] {
        &self.displayed
    }

    pub fn source(&self) -> StatementSource {
        self.source
    }
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in statement used when nothing could be loaded
pub fn fallback_transactions() -> Vec<Transaction> {
    use TransactionKind::{Credit, Debit};

    [
        ("15-01-2024", "€ 1.250,00", Credit),
        ("12-01-2024", "- € 500,00", Debit),
        ("10-01-2024", "€ 750,00", Credit),
        ("08-01-2024", "- € 300,00", Debit),
        ("05-01-2024", "€ 2.000,00", Credit),
        ("03-01-2024", "- € 150,00", Debit),
        ("01-01-2024", "€ 1.500,00", Credit),
        ("30-12-2023", "- € 800,00", Debit),
        ("28-12-2023", "€ 3.200,00", Credit),
        ("25-12-2023", "- € 450,00", Debit),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (date, balance, kind))| {
        Transaction::new(
            index as u64 + 1,
            date,
            "Holder name",
            FALLBACK_ACCOUNT,
            balance,
            kind,
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FilterConfig;

    fn loaded_store() -> TransactionStore {
        let mut store = TransactionStore::new();
        store.load(fallback_transactions(), StatementSource::Fallback);
        store
    }

    #[test]
    fn test_fallback_has_ten_alternating_lines() {
        let lines = fallback_transactions();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0].id, 1);
        assert_eq!(lines[9].id, 10);
        assert!(lines.iter().step_by(2).all(|tx| tx.is_credit()));
        assert!(lines.iter().skip(1).step_by(2).all(|tx| tx.is_debit()));
        assert!(lines.iter().all(|tx| !sign_disagrees(tx)));
    }

    #[test]
    fn test_load_shows_everything() {
        let store = loaded_store();
        assert_eq!(store.base().len(), 10);
        assert_eq!(store.displayed(), store.base());
        assert_eq!(store.source(), StatementSource::Fallback);
    }

    #[test]
    fn test_apply_leaves_base_untouched() {
        let mut store = loaded_store();
        let engine = FilterEngine::new(FilterConfig {
            credit_transactions: false,
            ..FilterConfig::default()
        });

        let shown = store.apply(&engine).len();
        assert_eq!(shown, 5);
        assert!(store.displayed().iter().all(|tx| tx.is_debit()));
        assert_eq!(store.base().len(), 10);
    }

    #[test]
    fn test_prepend_clears_filter() {
        let mut store = loaded_store();
        store.apply(&FilterEngine::new(FilterConfig {
            debit_transactions: false,
            ..FilterConfig::default()
        }));

        let id = store.next_id();
        assert_eq!(id, 11);
        store.prepend(Transaction::new(
            id,
            "16-01-2024",
            "Rent",
            FALLBACK_ACCOUNT,
            "- € 900,00",
            TransactionKind::Debit,
        ));

        assert_eq!(store.base().len(), 11);
        assert_eq!(store.displayed().len(), 11);
        assert_eq!(store.displayed()[0].id, 11);
    }

    #[test]
    fn test_reload_replaces_previous_lines() {
        let mut store = loaded_store();
        store.load(Vec::new(), StatementSource::Api);
        assert!(store.base().is_empty());
        assert!(store.displayed().is_empty());
        assert_eq!(store.source(), StatementSource::Api);
        assert_eq!(store.next_id(), 1);
    }
}
