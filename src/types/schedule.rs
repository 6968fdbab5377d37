//! Scheduled transfer types
//!
//! Only facts fixed at creation time are stored. How many payments have been
//! made and what the next payment looks like are derived against a given
//! "today" by [`crate::core::schedule`].

use super::error::PortalError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repetition of a scheduled transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferPeriod {
    OneTime,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl TransferPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPeriod::OneTime => "one-time",
            TransferPeriod::Daily => "daily",
            TransferPeriod::Weekly => "weekly",
            TransferPeriod::Monthly => "monthly",
            TransferPeriod::Yearly => "yearly",
        }
    }

    /// Days between two payments; `None` for one-time transfers
    pub fn interval_days(&self) -> Option<i64> {
        match self {
            TransferPeriod::OneTime => None,
            TransferPeriod::Daily => Some(1),
            TransferPeriod::Weekly => Some(7),
            TransferPeriod::Monthly => Some(30),
            TransferPeriod::Yearly => Some(365),
        }
    }

    pub fn is_recurring(&self) -> bool {
        *self != TransferPeriod::OneTime
    }
}

impl fmt::Display for TransferPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferPeriod {
    type Err = PortalError;

    /// Accepts both the short (`weekly`) and the long (`every-week`) spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one-time" => Ok(TransferPeriod::OneTime),
            "daily" | "every-day" => Ok(TransferPeriod::Daily),
            "weekly" | "every-week" => Ok(TransferPeriod::Weekly),
            "monthly" | "every-month" => Ok(TransferPeriod::Monthly),
            "yearly" | "every-year" => Ok(TransferPeriod::Yearly),
            _ => Err(PortalError::invalid_period(s)),
        }
    }
}

/// Kind of scheduled transfer as shown in the overview table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Scheduled,
    Recurring,
}

/// A transfer planned for one or more future dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTransfer {
    pub id: String,
    pub description: String,
    /// Display amount, e.g. `€ 250,00`
    pub amount: String,
    pub period: TransferPeriod,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: TransferStatus,
    /// Number of payments over the whole schedule, fixed at creation
    pub total_payments: u32,
    /// Whether the row is unfolded in the overview
    pub is_expanded: bool,
}

/// What happened at the previous payment moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousPayment {
    None,
    Completed,
}

/// What happens at the next payment moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPayment {
    Scheduled,
    Pending,
    TransferCompleted,
}

/// Payment status pair shown per scheduled transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentStatus {
    pub previous: PreviousPayment,
    pub next: NextPayment,
}

impl fmt::Display for PreviousPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PreviousPayment::None => "None",
            PreviousPayment::Completed => "Completed",
        })
    }
}

impl fmt::Display for NextPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NextPayment::Scheduled => "Scheduled",
            NextPayment::Pending => "Pending",
            NextPayment::TransferCompleted => "Transfer completed",
        })
    }
}
