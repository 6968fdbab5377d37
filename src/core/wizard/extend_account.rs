//! Extend a maturing MaxiSpaar deposit into a new term

use super::machine::WizardForm;
use super::required_amount;
use crate::core::catalogue::{find_option, maturity_date};
use crate::types::{AmountInput, FieldErrors, PortalError, SavingsOption, SavingsProduct};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct ExtendAccountForm {
    pub option_id: Option<String>,
    /// Extend only part of the balance
    pub partial: bool,
    /// Amount to extend; only read for partial extensions
    pub amount: AmountInput,
    pub today: NaiveDate,
}

/// The new term of an extended deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedDeposit {
    pub option: SavingsOption,
    /// `None` extends the full balance
    pub amount: Option<Decimal>,
    pub maturity_date: NaiveDate,
}

impl ExtendAccountForm {
    pub fn new(today: NaiveDate) -> Self {
        ExtendAccountForm {
            option_id: None,
            partial: false,
            amount: AmountInput::default(),
            today,
        }
    }

    fn option(&self) -> Result<SavingsOption, PortalError> {
        let id = self.option_id.as_deref().unwrap_or_default();
        find_option(SavingsProduct::MaxiSpaar, id)
    }
}

impl WizardForm for ExtendAccountForm {
    type Outcome = ExtendedDeposit;

    fn flow_name(&self) -> &'static str {
        "extend-account"
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.option().is_err() {
            errors.insert("term", "Please select a term");
        }
        if self.partial {
            if let Err(message) = required_amount(&self.amount, "Please enter an amount") {
                errors.insert("amount", message);
            }
        }
        errors
    }

    fn complete(&self) -> Result<ExtendedDeposit, PortalError> {
        let option = self.option()?;
        let amount = if self.partial {
            Some(
                required_amount(&self.amount, "Please enter an amount")
                    .map_err(PortalError::invalid_amount)?,
            )
        } else {
            None
        };

        Ok(ExtendedDeposit {
            maturity_date: maturity_date(self.today, &option),
            option,
            amount,
        })
    }

    fn reset(&mut self) {
        *self = ExtendAccountForm::new(self.today);
    }
}
