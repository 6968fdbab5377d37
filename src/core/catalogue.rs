//! Savings product catalogue
//!
//! Built-in terms and rates of the three savings product lines, plus the
//! values derived from them when a customer picks an option: value date,
//! maturity date and a projection of the interest to be paid out.

use crate::types::{IbanOption, PortalError, SavingsOption, SavingsProduct};
use chrono::{Duration, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

const MAXI_SPAAR_BALANCE_CLASS: &str = "€ 500 to € 500,000";
const COMBI_SPAAR_BALANCE_CLASS: &str = "€ 500 - € 100,000";
const SOLID_EXTRA_INTEREST: &str = "3 months Euribor + 0.05%";

fn option(
    id: &str,
    term: &str,
    interest: &str,
    rate: Option<Decimal>,
    valid_from: &str,
    balance_class: &str,
    days: u32,
) -> SavingsOption {
    SavingsOption {
        id: id.to_string(),
        term: term.to_string(),
        interest: interest.to_string(),
        rate,
        valid_from: valid_from.to_string(),
        balance_class: balance_class.to_string(),
        days,
    }
}

/// Options offered for `product`, shortest term first
pub fn savings_options(product: SavingsProduct) -> Vec<SavingsOption> {
    match product {
        SavingsProduct::MaxiSpaar => [
            ("3-months", "3 months", "1,85%", 185, "11.06.2025", 90),
            ("6-months", "6 months", "1,90%", 190, "18.07.2025", 180),
            ("9-months", "9 months", "1,95%", 195, "18.07.2025", 270),
            ("12-months", "12 months", "2,05%", 205, "18.07.2025", 365),
            ("2-years", "2 years", "2,10%", 210, "18.07.2025", 730),
            ("3-years", "3 years", "2,20%", 220, "18.07.2025", 1095),
            ("4-years", "4 years", "2,25%", 225, "18.07.2025", 1460),
            ("5-years", "5 years", "2,30%", 230, "18.07.2025", 1825),
        ]
        .into_iter()
        .map(|(id, term, interest, basis_points, valid_from, days)| {
            option(
                id,
                term,
                interest,
                Some(Decimal::new(basis_points, 2)),
                valid_from,
                MAXI_SPAAR_BALANCE_CLASS,
                days,
            )
        })
        .collect(),

        SavingsProduct::SolidExtra => [
            ("2-years", "2 years", 730),
            ("3-years", "3 years", 1095),
            ("4-years", "4 years", 1460),
            ("5-years", "5 years", 1825),
        ]
        .into_iter()
        .map(|(id, term, days)| {
            option(
                id,
                term,
                SOLID_EXTRA_INTEREST,
                None,
                "11.06.2025",
                MAXI_SPAAR_BALANCE_CLASS,
                days,
            )
        })
        .collect(),

        SavingsProduct::CombiSpaar => [
            ("1", "33 days", "2.5%", 25, 33),
            ("2", "66 days", "3.0%", 30, 66),
            ("3", "99 days", "3.5%", 35, 99),
        ]
        .into_iter()
        .map(|(id, days_label, interest, tenths, days)| {
            option(
                id,
                &format!("CombiSpaar {}", days_label),
                interest,
                Some(Decimal::new(tenths, 1)),
                "01 Jan 2024",
                COMBI_SPAAR_BALANCE_CLASS,
                days,
            )
        })
        .collect(),
    }
}

/// Look up one option of `product` by id
pub fn find_option(product: SavingsProduct, id: &str) -> Result<SavingsOption, PortalError> {
    savings_options(product)
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| PortalError::unknown_option(id))
}

/// Accounts offered as pay-in source when none could be fetched
pub fn default_iban_options() -> Vec<IbanOption> {
    vec![
        IbanOption {
            iban: "NL24DHBN2018470578".to_string(),
            account_name: "DHB SaveOnline".to_string(),
            balance: "€ 12.345,67".to_string(),
        },
        IbanOption {
            iban: "NL91DHBN2018470579".to_string(),
            account_name: "DHB Business Account".to_string(),
            balance: "€ 8.750,25".to_string(),
        },
    ]
}

/// Date from which a newly opened deposit earns interest
pub fn value_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(1)
}

/// Date on which the deposit of `option` ends
pub fn maturity_date(today: NaiveDate, option: &SavingsOption) -> NaiveDate {
    today + Duration::days(option.days as i64)
}

/// Format a date the way product pages show it, e.g. `16 Oct 2026`
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Length of the term in years
///
/// Month and year terms are taken from the option id (`9-months` is 0.75);
/// notice periods fall back to days over 365.
pub fn term_years(option: &SavingsOption) -> Decimal {
    let parsed = option.id.split_once('-').and_then(|(count, unit)| {
        let count = Decimal::from_str(count).ok()?;
        match unit {
            "month" | "months" => Some(count / Decimal::from(12)),
            "year" | "years" => Some(count),
            _ => None,
        }
    });
    parsed.unwrap_or_else(|| Decimal::from(option.days) / Decimal::from(365))
}

/// One interest payout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestPayment {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Interest expected over the whole term of a deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestProjection {
    pub total: Decimal,
    pub payments: Vec<InterestPayment>,
}

/// Project the interest on `principal` deposited into `option`
///
/// Terms of a year or less pay once at the end. Longer terms pay the total
/// in equal yearly parts on the anniversaries of the value date. Options
/// without a fixed rate cannot be projected and yield `None`.
pub fn project_interest(
    principal: Decimal,
    option: &SavingsOption,
    value_date: NaiveDate,
) -> Option<InterestProjection> {
    let rate = option.rate?;
    let years = term_years(option);
    let total = (principal * rate / Decimal::ONE_HUNDRED * years).round_dp(2);

    let whole_years = years.trunc();
    let payments = if years > Decimal::ONE {
        let count = whole_years.to_u32()?;
        let share = (total / whole_years).round_dp(2);
        (1..=count)
            .map(|year| {
                Some(InterestPayment {
                    date: value_date.checked_add_months(Months::new(12 * year))?,
                    amount: share,
                })
            })
            .collect::<Option<Vec<_>>>()?
    } else {
        vec![InterestPayment {
            date: value_date + Duration::days(option.days as i64),
            amount: total,
        }]
    };

    Some(InterestProjection { total, payments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(SavingsProduct::MaxiSpaar, 8)]
    #[case(SavingsProduct::SolidExtra, 4)]
    #[case(SavingsProduct::CombiSpaar, 3)]
    fn test_option_counts(#[case] product: SavingsProduct, #[case] expected: usize) {
        assert_eq!(savings_options(product).len(), expected);
    }

    #[test]
    fn test_maxi_spaar_terms() {
        let options = savings_options(SavingsProduct::MaxiSpaar);
        let first = &options[0];
        assert_eq!(first.id, "3-months");
        assert_eq!(first.interest, "1,85%");
        assert_eq!(first.rate, Some(Decimal::new(185, 2)));
        assert_eq!(first.valid_from, "11.06.2025");
        assert_eq!(first.days, 90);

        let last = &options[7];
        assert_eq!(last.id, "5-years");
        assert_eq!(last.rate, Some(Decimal::new(230, 2)));
        assert_eq!(last.days, 1825);
        assert!(options.iter().skip(1).all(|o| o.valid_from == "18.07.2025"));
    }

    #[test]
    fn test_solid_extra_has_no_fixed_rate() {
        let options = savings_options(SavingsProduct::SolidExtra);
        assert!(options.iter().all(|o| o.rate.is_none()));
        assert!(options.iter().all(|o| o.interest == "3 months Euribor + 0.05%"));
    }

    #[test]
    fn test_find_option() {
        let option = find_option(SavingsProduct::CombiSpaar, "2").unwrap();
        assert_eq!(option.term, "CombiSpaar 66 days");
        assert_eq!(option.rate, Some(Decimal::new(30, 1)));

        assert_eq!(
            find_option(SavingsProduct::CombiSpaar, "7").unwrap_err(),
            PortalError::unknown_option("7")
        );
    }

    #[test]
    fn test_dates() {
        let today = date(2025, 10, 16);
        let option = find_option(SavingsProduct::MaxiSpaar, "12-months").unwrap();

        assert_eq!(value_date(today), date(2025, 10, 17));
        assert_eq!(maturity_date(today, &option), date(2026, 10, 16));
        assert_eq!(format_display_date(maturity_date(today, &option)), "16 Oct 2026");
        assert_eq!(format_display_date(date(2026, 3, 1)), "1 Mar 2026");
    }

    #[rstest]
    #[case("3-months", Decimal::new(25, 2))]
    #[case("9-months", Decimal::new(75, 2))]
    #[case("12-months", Decimal::ONE)]
    #[case("4-years", Decimal::from(4))]
    fn test_term_years(#[case] id: &str, #[case] expected: Decimal) {
        let option = find_option(SavingsProduct::MaxiSpaar, id).unwrap();
        assert_eq!(term_years(&option), expected);
    }

    #[test]
    fn test_short_term_pays_once_at_the_end() {
        let option = find_option(SavingsProduct::MaxiSpaar, "3-months").unwrap();
        let start = date(2026, 1, 1);
        let projection = project_interest(Decimal::from(10_000), &option, start).unwrap();

        assert_eq!(projection.total, Decimal::new(4625, 2));
        assert_eq!(
            projection.payments,
            vec![InterestPayment {
                date: date(2026, 4, 1),
                amount: Decimal::new(4625, 2),
            }]
        );
    }

    #[test]
    fn test_long_term_pays_yearly() {
        let option = find_option(SavingsProduct::MaxiSpaar, "2-years").unwrap();
        let start = date(2026, 1, 1);
        let projection = project_interest(Decimal::from(10_000), &option, start).unwrap();

        assert_eq!(projection.total, Decimal::from(420));
        assert_eq!(projection.payments.len(), 2);
        assert_eq!(projection.payments[0].date, date(2027, 1, 1));
        assert_eq!(projection.payments[1].date, date(2028, 1, 1));
        assert!(projection.payments.iter().all(|p| p.amount == Decimal::from(210)));
    }

    #[test]
    fn test_variable_rate_cannot_be_projected() {
        let option = find_option(SavingsProduct::SolidExtra, "3-years").unwrap();
        assert!(project_interest(Decimal::from(1_000), &option, date(2026, 1, 1)).is_none());
    }
}
