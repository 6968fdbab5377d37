//! Scheduled transfer arithmetic
//!
//! Payment counts are derived from day differences and fixed period lengths
//! (30 days a month, 365 a year). Completed counts and payment status are
//! never stored; they are computed against the `today` the caller passes in.

use crate::types::{
    NextPayment, PaymentStatus, PreviousPayment, ScheduledTransfer, TransferPeriod,
    TransferStatus,
};
use chrono::{Duration, Months, NaiveDate};

/// Upper bound on the completed payment counter
pub const MAX_COMPLETED_PAYMENTS: u32 = 999;

/// Number of payment moments within `days` for a recurring period
fn payments_within(days: i64, period: TransferPeriod) -> u64 {
    match period.interval_days() {
        Some(interval) => (days.max(0) / interval) as u64 + 1,
        None => 1,
    }
}

/// Number of payments over the whole schedule
///
/// A transfer without an end date counts as a single payment.
pub fn total_payments(start: NaiveDate, end: Option<NaiveDate>, period: TransferPeriod) -> u32 {
    match end {
        Some(end) => {
            let days = (end - start).num_days();
            u32::try_from(payments_within(days, period)).unwrap_or(u32::MAX)
        }
        None => 1,
    }
}

/// Payments made up to and including `today`
pub fn completed_payments(transfer: &ScheduledTransfer, today: NaiveDate) -> u32 {
    if transfer.start_date > today {
        return 0;
    }
    let days = (today - transfer.start_date).num_days();
    let made = payments_within(days, transfer.period).min(MAX_COMPLETED_PAYMENTS as u64);
    made as u32
}

/// Status pair shown for a transfer on `today`
pub fn payment_status(transfer: &ScheduledTransfer, today: NaiveDate) -> PaymentStatus {
    if transfer.end_date.is_some_and(|end| end <= today) {
        return PaymentStatus {
            previous: PreviousPayment::Completed,
            next: NextPayment::TransferCompleted,
        };
    }

    if transfer.start_date == today || completed_payments(transfer, today) > 0 {
        return PaymentStatus {
            previous: PreviousPayment::Completed,
            next: NextPayment::Pending,
        };
    }

    PaymentStatus {
        previous: PreviousPayment::None,
        next: NextPayment::Scheduled,
    }
}

/// Date of the next payment after `today`
///
/// Months and years follow the calendar here. Returns `None` for a one-time
/// transfer that already went out.
pub fn next_payment_date(transfer: &ScheduledTransfer, today: NaiveDate) -> Option<NaiveDate> {
    let start = transfer.start_date;
    if start > today {
        return Some(start);
    }

    let made = completed_payments(transfer, today);
    match transfer.period {
        TransferPeriod::OneTime => None,
        TransferPeriod::Daily => Some(start + Duration::days(made as i64)),
        TransferPeriod::Weekly => Some(start + Duration::weeks(made as i64)),
        TransferPeriod::Monthly => start.checked_add_months(Months::new(made)),
        TransferPeriod::Yearly => start.checked_add_months(Months::new(made.saturating_mul(12))),
    }
}

/// Build a transfer with its total payment count fixed
pub fn plan_transfer(
    description: &str,
    amount: &str,
    period: TransferPeriod,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> ScheduledTransfer {
    let status = if period.is_recurring() {
        TransferStatus::Recurring
    } else {
        TransferStatus::Scheduled
    };

    ScheduledTransfer {
        id: uuid::Uuid::new_v4().to_string(),
        description: description.to_string(),
        amount: amount.to_string(),
        period,
        start_date,
        end_date,
        status,
        total_payments: total_payments(start_date, end_date, period),
        is_expanded: false,
    }
}

/// Scheduled transfers of one account view
#[derive(Debug, Clone, Default)]
pub struct ScheduleBook {
    transfers: Vec<ScheduledTransfer>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, transfer: ScheduledTransfer) {
        tracing::info!(
            "Scheduled {} transfer '{}' of {} ({} payments)",
            transfer.period,
            transfer.description,
            transfer.amount,
            transfer.total_payments
        );
        self.transfers.push(transfer);
    }

    /// Fold or unfold a row; returns `false` when the id is unknown
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.transfers.iter_mut().find(|t| t.id == id) {
            Some(transfer) => {
                transfer.is_expanded = !transfer.is_expanded;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledTransfer> {
        self.transfers.iter().find(|t| t.id == id)
    }

    pub fn transfers(&self) -> &[ScheduledTransfer] {
        &self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 16)
    }

    fn transfer(period: TransferPeriod, start: NaiveDate, end: Option<NaiveDate>) -> ScheduledTransfer {
        plan_transfer("Rent", "€ 900,00", period, start, end)
    }

    #[rstest]
    #[case::no_end(TransferPeriod::Daily, None, 1)]
    #[case::daily(TransferPeriod::Daily, Some(date(2026, 1, 10)), 10)]
    #[case::weekly(TransferPeriod::Weekly, Some(date(2026, 1, 29)), 5)]
    #[case::monthly(TransferPeriod::Monthly, Some(date(2026, 12, 31)), 13)]
    #[case::yearly(TransferPeriod::Yearly, Some(date(2028, 1, 1)), 3)]
    #[case::one_time(TransferPeriod::OneTime, Some(date(2026, 6, 1)), 1)]
    fn test_total_payments(
        #[case] period: TransferPeriod,
        #[case] end: Option<NaiveDate>,
        #[case] expected: u32,
    ) {
        assert_eq!(total_payments(date(2026, 1, 1), end, period), expected);
    }

    #[test]
    fn test_daily_started_nine_days_ago_has_ten_payments() {
        let t = transfer(TransferPeriod::Daily, today() - Duration::days(9), None);
        assert_eq!(completed_payments(&t, today()), 10);
    }

    #[rstest]
    #[case(TransferPeriod::Weekly, 15, 3)]
    #[case(TransferPeriod::Monthly, 61, 3)]
    #[case(TransferPeriod::Yearly, 364, 1)]
    #[case(TransferPeriod::OneTime, 40, 1)]
    fn test_completed_payments(
        #[case] period: TransferPeriod,
        #[case] days_ago: i64,
        #[case] expected: u32,
    ) {
        let t = transfer(period, today() - Duration::days(days_ago), None);
        assert_eq!(completed_payments(&t, today()), expected);
    }

    #[test]
    fn test_completed_payments_capped() {
        let t = transfer(TransferPeriod::Daily, date(2020, 1, 1), None);
        assert_eq!(completed_payments(&t, today()), MAX_COMPLETED_PAYMENTS);
    }

    #[test]
    fn test_future_start_is_scheduled() {
        let t = transfer(TransferPeriod::Monthly, today() + Duration::days(3), None);
        assert_eq!(completed_payments(&t, today()), 0);
        assert_eq!(
            payment_status(&t, today()),
            PaymentStatus {
                previous: PreviousPayment::None,
                next: NextPayment::Scheduled,
            }
        );
    }

    #[test]
    fn test_started_today_is_pending() {
        let t = transfer(TransferPeriod::Weekly, today(), Some(today() + Duration::days(30)));
        assert_eq!(payment_status(&t, today()).next, NextPayment::Pending);
        assert_eq!(payment_status(&t, today()).previous, PreviousPayment::Completed);
    }

    #[test]
    fn test_ended_transfer_is_completed() {
        let t = transfer(
            TransferPeriod::Daily,
            today() - Duration::days(20),
            Some(today() - Duration::days(1)),
        );
        assert_eq!(
            payment_status(&t, today()),
            PaymentStatus {
                previous: PreviousPayment::Completed,
                next: NextPayment::TransferCompleted,
            }
        );
    }

    #[rstest]
    #[case(TransferPeriod::Daily, date(2026, 10, 10), Some(date(2026, 10, 17)))]
    #[case(TransferPeriod::Weekly, date(2026, 10, 2), Some(date(2026, 10, 23)))]
    #[case(TransferPeriod::Monthly, date(2026, 9, 16), Some(date(2026, 11, 16)))]
    #[case(TransferPeriod::OneTime, date(2026, 10, 1), None)]
    #[case(TransferPeriod::Yearly, date(2026, 12, 1), Some(date(2026, 12, 1)))]
    fn test_next_payment_date(
        #[case] period: TransferPeriod,
        #[case] start: NaiveDate,
        #[case] expected: Option<NaiveDate>,
    ) {
        let t = transfer(period, start, None);
        assert_eq!(next_payment_date(&t, today()), expected);
    }

    #[test]
    fn test_plan_transfer_sets_status_and_total() {
        let recurring = transfer(TransferPeriod::Weekly, date(2026, 11, 1), Some(date(2026, 11, 29)));
        assert_eq!(recurring.status, TransferStatus::Recurring);
        assert_eq!(recurring.total_payments, 5);
        assert!(!recurring.is_expanded);

        let once = transfer(TransferPeriod::OneTime, date(2026, 11, 1), None);
        assert_eq!(once.status, TransferStatus::Scheduled);
        assert_eq!(once.total_payments, 1);
        assert_ne!(once.id, recurring.id);
    }

    #[test]
    fn test_book_toggle() {
        let mut book = ScheduleBook::new();
        let t = transfer(TransferPeriod::Daily, today(), None);
        let id = t.id.clone();
        book.add(t);

        assert!(book.toggle(&id));
        assert!(book.get(&id).unwrap().is_expanded);
        assert!(book.toggle(&id));
        assert!(!book.get(&id).unwrap().is_expanded);
        assert!(!book.toggle("missing"));
        assert_eq!(book.len(), 1);
    }
}
