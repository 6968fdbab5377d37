//! Core business logic module
//!
//! This module contains the portal's headless logic:
//! - `balance` - Display amount parsing and formatting
//! - `filter_engine` - Statement filtering
//! - `transaction_store` - Base and displayed statement lines per view
//! - `schedule` - Scheduled transfer payment arithmetic
//! - `catalogue` - Savings products, dates and interest projection
//! - `verification` - Two-factor code issuance and checking
//! - `wizard` - Confirmation flows

pub mod balance;
pub mod catalogue;
pub mod filter_engine;
pub mod schedule;
pub mod transaction_store;
pub mod verification;
pub mod wizard;

pub use filter_engine::{apply_filters, FilterEngine};
pub use schedule::ScheduleBook;
pub use transaction_store::{fallback_transactions, StatementSource, TransactionStore};
pub use verification::{CodeStore, DeliveryChannel, LogChannel, Verifier};
pub use wizard::{Wizard, WizardForm};
