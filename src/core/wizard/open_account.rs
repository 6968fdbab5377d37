//! Open a savings deposit

use super::machine::WizardForm;
use super::required_amount;
use crate::core::catalogue::{
    find_option, maturity_date, project_interest, value_date, InterestProjection,
};
use crate::types::{AmountInput, FieldErrors, PortalError, SavingsOption, SavingsProduct};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Fields of the account opening form
#[derive(Debug, Clone)]
pub struct OpenAccountForm {
    pub product: SavingsProduct,
    /// IBAN of the account paying in
    pub iban: String,
    pub option_id: Option<String>,
    pub amount: AmountInput,
    pub terms_accepted: bool,
    /// Date the flow runs on; drives value and maturity dates
    pub today: NaiveDate,
}

/// A deposit ready to be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedAccount {
    pub product: SavingsProduct,
    pub option: SavingsOption,
    pub iban: String,
    pub amount: Decimal,
    pub value_date: NaiveDate,
    pub maturity_date: NaiveDate,
    /// `None` for variable-rate products
    pub interest: Option<InterestProjection>,
}

impl OpenAccountForm {
    pub fn new(product: SavingsProduct, today: NaiveDate) -> Self {
        OpenAccountForm {
            product,
            iban: String::new(),
            option_id: None,
            amount: AmountInput::default(),
            terms_accepted: false,
            today,
        }
    }

    fn selected_option(&self) -> Option<SavingsOption> {
        let id = self.option_id.as_deref()?;
        find_option(self.product, id).ok()
    }
}

impl WizardForm for OpenAccountForm {
    type Outcome = OpenedAccount;

    fn flow_name(&self) -> &'static str {
        "open-account"
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.iban.trim().is_empty() {
            errors.insert("iban", "Please select an IBAN");
        }
        if self.selected_option().is_none() {
            let message = match self.product {
                SavingsProduct::CombiSpaar => "Please select a notice period",
                _ => "Please select a savings option",
            };
            errors.insert("option", message);
        }
        if let Err(message) = required_amount(&self.amount, "Please enter an amount") {
            errors.insert("amount", message);
        }

        errors
    }

    fn confirm(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.terms_accepted {
            errors.insert("terms", "Please accept the Terms and Conditions");
        }
        errors
    }

    fn complete(&self) -> Result<OpenedAccount, PortalError> {
        let id = self.option_id.as_deref().unwrap_or_default();
        let option = find_option(self.product, id)?;
        let amount = required_amount(&self.amount, "Please enter an amount")
            .map_err(PortalError::invalid_amount)?;

        let value_date = value_date(self.today);
        Ok(OpenedAccount {
            product: self.product,
            iban: self.iban.trim().to_string(),
            amount,
            value_date,
            maturity_date: maturity_date(self.today, &option),
            interest: project_interest(amount, &option, value_date),
            option,
        })
    }

    fn reset(&mut self) {
        *self = OpenAccountForm::new(self.product, self.today);
    }
}
