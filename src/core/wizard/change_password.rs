//! Change the login password

use super::machine::WizardForm;
use crate::types::{FieldErrors, PortalError};

/// Minimum length of a new password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Result of checking the current password against the server
///
/// Only [`PasswordCheck::Valid`] lets the form through; the check has to be
/// made again whenever the current password changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordCheck {
    /// Not checked yet
    #[default]
    Unchecked,
    Valid,
    Invalid,
    /// The check itself could not be made
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub current_password_check: PasswordCheck,
}

/// Verified request to replace the password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub new_password: String,
}

impl ChangePasswordForm {
    /// Replace the current password, dropping any earlier check result
    pub fn set_current_password(&mut self, password: &str) {
        if self.current_password != password {
            self.current_password = password.to_string();
            self.current_password_check = PasswordCheck::Unchecked;
        }
    }
}

impl WizardForm for ChangePasswordForm {
    type Outcome = PasswordChange;

    fn flow_name(&self) -> &'static str {
        "change-password"
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.current_password.is_empty() {
            errors.insert("currentPassword", "Current password is required");
        } else {
            match self.current_password_check {
                PasswordCheck::Invalid => {
                    errors.insert("currentPassword", "Current password is incorrect")
                }
                PasswordCheck::Failed => {
                    errors.insert("currentPassword", "Failed to validate password")
                }
                PasswordCheck::Unchecked => {
                    errors.insert("currentPassword", "Current password has not been validated")
                }
                PasswordCheck::Valid => {}
            }
        }

        if self.new_password.is_empty() {
            errors.insert("newPassword", "New password is required");
        } else if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert("newPassword", "New password must be at least 6 characters");
        }

        if self.confirm_password.is_empty() {
            errors.insert("confirmPassword", "Please confirm your new password");
        } else if self.confirm_password != self.new_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }

        errors
    }

    fn complete(&self) -> Result<PasswordChange, PortalError> {
        Ok(PasswordChange {
            new_password: self.new_password.clone(),
        })
    }

    fn reset(&mut self) {
        *self = ChangePasswordForm::default();
    }
}
