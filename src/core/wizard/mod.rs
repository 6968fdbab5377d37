//! Confirmation wizards
//!
//! - `machine` - the shared Form → Summary → TwoFactor → Success machine
//! - `open_account` - open a MaxiSpaar, SolidExtra or CombiSpaar deposit
//! - `extend_account` - roll a MaxiSpaar deposit into a new term
//! - `counter_account` - change the linked payout account
//! - `change_password` - change the login password
//! - `transfer` - one-time or recurring transfers

pub mod change_password;
pub mod counter_account;
pub mod extend_account;
pub mod machine;
pub mod open_account;
pub mod transfer;

pub use change_password::{ChangePasswordForm, PasswordChange, PasswordCheck};
pub use counter_account::{CounterAccountChange, CounterAccountForm};
pub use extend_account::{ExtendAccountForm, ExtendedDeposit};
pub use machine::{Wizard, WizardForm, INVALID_CODE_MESSAGE, VERIFICATION_FIELD};
pub use open_account::{OpenAccountForm, OpenedAccount};
pub use transfer::{TransferForm, TransferOutcome};

use crate::types::AmountInput;
use rust_decimal::Decimal;

/// Read a required amount field
///
/// Returns the message to show when the field is blank or malformed. A
/// blank whole part next to a filled decimal part counts as zero euros.
pub(crate) fn required_amount(input: &AmountInput, missing: &'static str) -> Result<Decimal, &'static str> {
    if input.is_blank() {
        return Err(missing);
    }
    let input = if input.whole.trim().is_empty() {
        AmountInput::new("0", &input.decimal)
    } else {
        input.clone()
    };
    match input.value() {
        Ok(Some(value)) => Ok(value),
        _ => Err("Please enter a valid amount"),
    }
}
