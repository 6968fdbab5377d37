//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: statement lines and their direction
//! - `filter`: statement filter configuration
//! - `schedule`: scheduled transfers and payment status
//! - `savings`: savings products, options and pay-in accounts
//! - `wizard`: wizard steps and per-field errors
//! - `error`: error types for the portal engine

pub mod error;
pub mod filter;
pub mod savings;
pub mod schedule;
pub mod transaction;
pub mod wizard;

pub use error::PortalError;
pub use filter::{AmountInput, FilterConfig, PeriodFilter, DEFAULT_TRANSACTIONS_COUNT};
pub use savings::{IbanOption, SavingsOption, SavingsProduct};
pub use schedule::{
    NextPayment, PaymentStatus, PreviousPayment, ScheduledTransfer, TransferPeriod,
    TransferStatus,
};
pub use transaction::{Transaction, TransactionId, TransactionKind};
pub use wizard::{FieldErrors, WizardStep};
