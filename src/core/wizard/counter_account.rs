//! Change the counter account linked to a savings account

use super::machine::WizardForm;
use crate::types::{FieldErrors, PortalError};

#[derive(Debug, Clone, Default)]
pub struct CounterAccountForm {
    pub iban: String,
    /// Account holder as returned by the account lookup, if it succeeded
    pub holder_name: Option<String>,
    /// Customer ticked "these details are correct" on the summary
    pub details_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterAccountChange {
    /// IBAN in electronic format: upper case, no spaces
    pub iban: String,
    pub holder_name: Option<String>,
}

/// Strip spaces and upper-case an IBAN
pub fn normalize_iban(iban: &str) -> String {
    iban.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Check length, layout and the ISO 13616 mod-97 checksum
pub fn is_valid_iban(iban: &str) -> bool {
    let iban = normalize_iban(iban);
    let bytes = iban.as_bytes();

    if !(15..=34).contains(&bytes.len())
        || !bytes[..2].iter().all(u8::is_ascii_uppercase)
        || !bytes[2..4].iter().all(u8::is_ascii_digit)
        || !bytes.iter().all(u8::is_ascii_alphanumeric)
    {
        return false;
    }

    let remainder = bytes[4..]
        .iter()
        .chain(&bytes[..4])
        .fold(0u32, |acc, &b| {
            if b.is_ascii_digit() {
                (acc * 10 + u32::from(b - b'0')) % 97
            } else {
                (acc * 100 + u32::from(b - b'A' + 10)) % 97
            }
        });
    remainder == 1
}

impl WizardForm for CounterAccountForm {
    type Outcome = CounterAccountChange;

    fn flow_name(&self) -> &'static str {
        "counter-account"
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.iban.trim().is_empty() {
            errors.insert("iban", "Please enter an IBAN");
        } else if !is_valid_iban(&self.iban) {
            errors.insert("iban", "Please enter a valid IBAN");
        }
        errors
    }

    fn confirm(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.details_confirmed {
            errors.insert("confirm", "Please confirm the account details");
        }
        errors
    }

    fn complete(&self) -> Result<CounterAccountChange, PortalError> {
        Ok(CounterAccountChange {
            iban: normalize_iban(&self.iban),
            holder_name: self.holder_name.clone(),
        })
    }

    fn reset(&mut self) {
        *self = CounterAccountForm::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NL91ABNA0417164300", true)]
    #[case("nl91 abna 0417 1643 00", true)]
    #[case("GB82 WEST 1234 5698 7654 32", true)]
    #[case("NL92ABNA0417164300", false)]
    #[case("AAAAA", false)]
    #[case("NL91ABNA04171643@0", false)]
    fn test_is_valid_iban(#[case] iban: &str, #[case] expected: bool) {
        assert_eq!(is_valid_iban(iban), expected);
    }

    #[test]
    fn test_validate_messages() {
        let mut form = CounterAccountForm::default();
        assert_eq!(form.validate().get("iban"), Some("Please enter an IBAN"));

        form.iban = "AAAAA".to_string();
        assert_eq!(form.validate().get("iban"), Some("Please enter a valid IBAN"));

        form.iban = "NL91 ABNA 0417 1643 00".to_string();
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_confirmation_required_and_iban_normalized() {
        let mut form = CounterAccountForm {
            iban: "nl91 abna 0417 1643 00".to_string(),
            ..CounterAccountForm::default()
        };
        assert!(form.confirm().contains("confirm"));

        form.details_confirmed = true;
        assert!(form.confirm().is_empty());
        assert_eq!(form.complete().unwrap().iban, "NL91ABNA0417164300");
    }
}
