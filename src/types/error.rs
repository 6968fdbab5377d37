//! Error types for the portal engine
//!
//! This module defines every error that can surface from statement loading,
//! filtering, exporting and the wizard flows. Errors are descriptive enough
//! to be printed directly by the CLI.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: file not found, permission denied, etc.
//! - **Parse Errors**: malformed CSV rows, amounts, dates, transaction types
//! - **Wizard Errors**: field validation failures and rejected transitions
//! - **Verification Errors**: unknown session, expired code, too many attempts
//! - **Network Errors**: transport failures, API error statuses, cancellation

use super::wizard::{FieldErrors, WizardStep};
use thiserror::Error;

/// Main error type for the portal engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortalError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped by the statement reader.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Transaction type other than credit or debit
    #[error("Invalid transaction type '{value}'")]
    InvalidTransactionType {
        /// The rejected type string
        value: String,
    },

    /// Amount that could not be parsed
    #[error("Invalid amount '{value}'")]
    InvalidAmount {
        /// The rejected amount string
        value: String,
    },

    /// Date that could not be parsed
    #[error("Invalid date '{value}'")]
    InvalidDate {
        /// The rejected date string
        value: String,
    },

    /// Unknown transfer period or filter period
    #[error("Invalid period '{value}'")]
    InvalidPeriod {
        /// The rejected period string
        value: String,
    },

    /// Savings option id not present in the product catalogue
    #[error("Unknown savings option '{id}'")]
    UnknownOption {
        /// The option id that was looked up
        id: String,
    },

    /// One or more form fields failed validation
    ///
    /// Non-fatal: the wizard stays on its current step and keeps the
    /// per-field messages for inline display.
    #[error("Validation failed: {errors}")]
    Validation {
        /// Per-field error messages
        errors: FieldErrors,
    },

    /// Wizard action not allowed in the current step
    #[error("Cannot {action} while at {from} step")]
    InvalidTransition {
        /// Step the wizard was in
        from: WizardStep,
        /// The rejected action
        action: String,
    },

    /// No verification code was issued for the session
    #[error("No verification code has been issued")]
    UnknownSession {
        /// Session identifier
        session: String,
    },

    /// The entered code does not match the issued one
    #[error("Invalid verification code")]
    InvalidCode {
        /// Session identifier
        session: String,
    },

    /// The verification code outlived its time-to-live
    #[error("The verification code has expired, please request a new one")]
    CodeExpired {
        /// Session identifier
        session: String,
    },

    /// Too many wrong codes were entered for the session
    #[error("Too many attempts, please request a new code")]
    TooManyAttempts {
        /// Session identifier
        session: String,
    },

    /// The out-of-band channel could not deliver the code
    #[error("Failed to deliver verification code: {message}")]
    DeliveryFailed {
        /// Description of the delivery failure
        message: String,
    },

    /// Transport-level HTTP failure (connection refused, timeout, ...)
    #[error("HTTP error: {message}")]
    Http {
        /// Description of the transport failure
        message: String,
    },

    /// The API answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// A response body could not be decoded
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decoding failure
        message: String,
    },

    /// The operation was cancelled because its view was discarded
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for PortalError {
    fn from(error: std::io::Error) -> Self {
        PortalError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for PortalError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        PortalError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return PortalError::Decode {
                message: error.to_string(),
            };
        }
        PortalError::Http {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(error: serde_json::Error) -> Self {
        PortalError::Decode {
            message: error.to_string(),
        }
    }
}

impl PortalError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(value: &str) -> Self {
        PortalError::InvalidAmount {
            value: value.to_string(),
        }
    }

    /// Create an InvalidDate error
    pub fn invalid_date(value: &str) -> Self {
        PortalError::InvalidDate {
            value: value.to_string(),
        }
    }

    /// Create an InvalidPeriod error
    pub fn invalid_period(value: &str) -> Self {
        PortalError::InvalidPeriod {
            value: value.to_string(),
        }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(value: &str) -> Self {
        PortalError::InvalidTransactionType {
            value: value.to_string(),
        }
    }

    /// Create an UnknownOption error
    pub fn unknown_option(id: &str) -> Self {
        PortalError::UnknownOption { id: id.to_string() }
    }

    /// Create a Validation error
    pub fn validation(errors: FieldErrors) -> Self {
        PortalError::Validation { errors }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(from: WizardStep, action: &str) -> Self {
        PortalError::InvalidTransition {
            from,
            action: action.to_string(),
        }
    }

    /// Create an UnknownSession error
    pub fn unknown_session(session: &str) -> Self {
        PortalError::UnknownSession {
            session: session.to_string(),
        }
    }

    /// Create an InvalidCode error
    pub fn invalid_code(session: &str) -> Self {
        PortalError::InvalidCode {
            session: session.to_string(),
        }
    }

    /// Create a CodeExpired error
    pub fn code_expired(session: &str) -> Self {
        PortalError::CodeExpired {
            session: session.to_string(),
        }
    }

    /// Create a TooManyAttempts error
    pub fn too_many_attempts(session: &str) -> Self {
        PortalError::TooManyAttempts {
            session: session.to_string(),
        }
    }

    /// Create an Api error
    pub fn api(status: u16, message: &str) -> Self {
        PortalError::Api {
            status,
            message: message.to_string(),
        }
    }

    /// Whether the error came from cancelling the owning view
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PortalError::Cancelled)
    }
}
