//! One-time and recurring transfers
//!
//! A finished transfer always becomes a [`ScheduledTransfer`]. When its first
//! payment falls on or before the day the flow runs, the payment is also
//! booked right away as a debit line on top of the statement.

use super::machine::WizardForm;
use super::required_amount;
use crate::core::balance::format_display_amount;
use crate::core::schedule::{plan_transfer, ScheduleBook};
use crate::core::transaction_store::{TransactionStore, FALLBACK_ACCOUNT};
use crate::types::{
    AmountInput, FieldErrors, PortalError, ScheduledTransfer, Transaction, TransactionKind,
    TransferPeriod,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct TransferForm {
    pub amount: AmountInput,
    pub explanation: String,
    pub period: TransferPeriod,
    /// Execution date of a one-time transfer, first payment otherwise
    pub start_date: Option<NaiveDate>,
    /// Last payment of a recurring transfer
    pub end_date: Option<NaiveDate>,
    /// Account the money leaves
    pub account: String,
    pub today: NaiveDate,
}

/// What a confirmed transfer produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub transfer: ScheduledTransfer,
    pub amount: Decimal,
    /// Set when the first payment is due on or before the booking day
    pub booking_date: Option<NaiveDate>,
    pub account: String,
}

impl TransferOutcome {
    /// Statement line for the payment booked today, numbered `id`
    pub fn booked_line(&self, id: u64) -> Option<Transaction> {
        let date = self.booking_date?;
        Some(Transaction::new(
            id,
            &date.format("%d-%m-%Y").to_string(),
            &self.transfer.description,
            &self.account,
            &format_display_amount(-self.amount),
            TransactionKind::Debit,
        ))
    }

    /// Record the transfer in the schedule and book any payment due now
    pub fn apply(self, store: &mut TransactionStore, book: &mut ScheduleBook) {
        if let Some(line) = self.booked_line(store.next_id()) {
            tracing::info!("Booked transfer payment of {} on {}", line.balance, line.date);
            store.prepend(line);
        }
        book.add(self.transfer);
    }
}

impl TransferForm {
    pub fn new(period: TransferPeriod, today: NaiveDate) -> Self {
        TransferForm {
            amount: AmountInput::default(),
            explanation: String::new(),
            period,
            start_date: None,
            end_date: None,
            account: FALLBACK_ACCOUNT.to_string(),
            today,
        }
    }
}

impl WizardForm for TransferForm {
    type Outcome = TransferOutcome;

    fn flow_name(&self) -> &'static str {
        "transfer"
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if let Err(message) = required_amount(&self.amount, "Amount is required") {
            errors.insert("amount", message);
        }
        if self.explanation.trim().is_empty() {
            errors.insert("explanation", "Explanation is required");
        }

        if self.period.is_recurring() {
            match (self.start_date, self.end_date) {
                (None, end) => {
                    errors.insert("startDate", "Start date is required");
                    if end.is_none() {
                        errors.insert("endDate", "End date is required");
                    }
                }
                (Some(_), None) => errors.insert("endDate", "End date is required"),
                (Some(start), Some(end)) if end < start => {
                    errors.insert("endDate", "End date cannot be earlier than start date")
                }
                _ => {}
            }
        } else if self.start_date.is_none() {
            errors.insert("startDate", "Date is required");
        }

        if self.start_date.is_some_and(|start| start < self.today) {
            errors.insert("startDate", "Date cannot be in the past");
        }
        if self.period.is_recurring() && self.end_date.is_some_and(|end| end < self.today) {
            errors.insert("endDate", "Date cannot be in the past");
        }

        errors
    }

    fn complete(&self) -> Result<TransferOutcome, PortalError> {
        let amount = required_amount(&self.amount, "Amount is required")
            .map_err(PortalError::invalid_amount)?;
        let start = self
            .start_date
            .ok_or_else(|| PortalError::invalid_date("missing start date"))?;
        let end = if self.period.is_recurring() {
            self.end_date
        } else {
            None
        };

        let transfer = plan_transfer(
            self.explanation.trim(),
            &format_display_amount(amount),
            self.period,
            start,
            end,
        );

        Ok(TransferOutcome {
            transfer,
            amount,
            booking_date: (start <= self.today).then_some(self.today),
            account: self.account.clone(),
        })
    }

    fn reset(&mut self) {
        *self = TransferForm::new(self.period, self.today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction_store::{fallback_transactions, StatementSource};
    use crate::types::TransferStatus;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn filled(period: TransferPeriod, start: NaiveDate, end: Option<NaiveDate>) -> TransferForm {
        TransferForm {
            amount: AmountInput::new("250", ""),
            explanation: "Rent".to_string(),
            start_date: Some(start),
            end_date: end,
            ..TransferForm::new(period, today())
        }
    }

    #[test]
    fn test_empty_one_time_form() {
        let errors = TransferForm::new(TransferPeriod::OneTime, today()).validate();
        assert_eq!(errors.get("amount"), Some("Amount is required"));
        assert_eq!(errors.get("explanation"), Some("Explanation is required"));
        assert_eq!(errors.get("startDate"), Some("Date is required"));
        assert!(!errors.contains("endDate"));
    }

    #[test]
    fn test_empty_recurring_form_needs_both_dates() {
        let errors = TransferForm::new(TransferPeriod::Monthly, today()).validate();
        assert_eq!(errors.get("startDate"), Some("Start date is required"));
        assert_eq!(errors.get("endDate"), Some("End date is required"));
    }

    #[test]
    fn test_end_before_start() {
        let form = filled(
            TransferPeriod::Weekly,
            today() + Duration::days(10),
            Some(today() + Duration::days(3)),
        );
        assert_eq!(
            form.validate().get("endDate"),
            Some("End date cannot be earlier than start date")
        );
    }

    #[test]
    fn test_past_dates_rejected() {
        let form = filled(
            TransferPeriod::Daily,
            today() - Duration::days(2),
            Some(today() - Duration::days(1)),
        );
        let errors = form.validate();
        assert_eq!(errors.get("startDate"), Some("Date cannot be in the past"));
        assert_eq!(errors.get("endDate"), Some("Date cannot be in the past"));
    }

    #[test]
    fn test_future_transfer_books_nothing() {
        let form = filled(
            TransferPeriod::Monthly,
            today() + Duration::days(1),
            Some(today() + Duration::days(91)),
        );
        assert!(form.validate().is_empty());

        let outcome = form.complete().unwrap();
        assert_eq!(outcome.booking_date, None);
        assert_eq!(outcome.transfer.total_payments, 4);
        assert_eq!(outcome.transfer.status, TransferStatus::Recurring);
        assert_eq!(outcome.transfer.amount, "€ 250,00");
        assert!(outcome.booked_line(1).is_none());
    }

    #[test]
    fn test_transfer_today_prepends_debit_and_clears_filter() {
        let outcome = filled(TransferPeriod::OneTime, today(), None).complete().unwrap();

        let mut store = TransactionStore::new();
        store.load(fallback_transactions(), StatementSource::Fallback);
        store.apply(&crate::core::filter_engine::FilterEngine::new(
            crate::types::FilterConfig::default(),
        ));
        assert_eq!(store.displayed().len(), 5);

        let mut book = ScheduleBook::new();
        outcome.apply(&mut store, &mut book);

        let top = &store.displayed()[0];
        assert_eq!(top.id, 11);
        assert_eq!(top.date, "16-10-2026");
        assert_eq!(top.description, "Rent");
        assert_eq!(top.balance, "- € 250,00");
        assert!(top.is_debit());
        assert_eq!(store.displayed().len(), 11);
        assert_eq!(book.len(), 1);
        assert_eq!(book.transfers()[0].status, TransferStatus::Scheduled);
    }
}
