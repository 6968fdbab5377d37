//! Savings Portal Engine Library
//! # Overview
//!
//! Headless logic of a retail savings portal: statement filtering and CSV
//! export, the confirm-and-verify wizards behind every account change, and
//! the arithmetic of savings products and scheduled transfers.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, FilterConfig, WizardStep, etc.)
//! - [`cli`] - CLI argument parsing and command pipelines
//! - [`core`] - Business logic components:
//!   - [`core::filter_engine`] - Type, amount, period and count filtering
//!   - [`core::transaction_store`] - Base and displayed lines of a statement view
//!   - [`core::wizard`] - Form, Summary, TwoFactor and Success flows
//!   - [`core::verification`] - Two-factor code issuance and checking
//!   - [`core::schedule`] - Scheduled transfer payment counts and status
//!   - [`core::catalogue`] - Savings options, value and maturity dates, interest
//! - [`io`] - Statement CSV reading and export
//! - [`client`] - Portal API access with cancellation and fallbacks
//!
//! # Statement Lines
//!
//! A statement line keeps its values as displayed: a `dd-mm-yyyy` date and
//! a balance such as `€ 1.250,00` or `- € 500,00`. Its `type` (credit or
//! debit) decides type filtering; amount filtering compares the absolute
//! value of the balance against inclusive bounds.
//!
//! # Wizards
//!
//! Opening, extending, changing the counter account, changing the password
//! and transferring money all follow the same flow:
//!
//! - **Form**: fields are edited and validated
//! - **Summary**: values are shown for review; the flow may go back to Form
//! - **TwoFactor**: a six digit code sent out of band must be entered
//! - **Success**: the change is done; closing returns to an empty Form

// Module declarations
pub mod cli;
pub mod client;
pub mod core;
pub mod io;
pub mod types;

pub use self::core::{apply_filters, FilterEngine, TransactionStore, Wizard, WizardForm};
pub use io::{write_statement_csv, StatementExport};
pub use types::{
    FilterConfig, PortalError, Transaction, TransactionId, TransactionKind, WizardStep,
};
