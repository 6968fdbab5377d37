//! Wizard state machine
//!
//! Every confirmation flow in the portal walks the same four steps:
//!
//! ```text
//!            proceed            confirm             verify
//!   Form ───────────▶ Summary ───────────▶ TwoFactor ──────────▶ Success
//!     ▲                │  ▲                  │                     │
//!     └──── edit ──────┘  └────── back ──────┘                     │
//!     ▲                                                            │
//!     └─────────────── close (any step) / finish ──────────────────┘
//! ```
//!
//! The flow-specific parts (fields, validation, outcome) live behind the
//! [`WizardForm`] trait. An action that is not allowed in the current step
//! is rejected with [`PortalError::InvalidTransition`] and changes nothing.

use crate::core::verification::{CodeEntry, Verifier};
use crate::types::{FieldErrors, PortalError, WizardStep};
use std::sync::Arc;

/// Field key under which verification problems are reported
pub const VERIFICATION_FIELD: &str = "verification";

/// Message shown when the entered code is rejected
pub const INVALID_CODE_MESSAGE: &str = "Invalid verification code";

/// Flow-specific half of a wizard
pub trait WizardForm {
    /// What a finished flow yields
    type Outcome;

    /// Short name used in logs
    fn flow_name(&self) -> &'static str;

    /// Check the form fields before showing the summary
    fn validate(&self) -> FieldErrors;

    /// Checks made on the summary step, such as accepted terms
    fn confirm(&self) -> FieldErrors {
        FieldErrors::new()
    }

    /// Build the outcome of a verified flow
    fn complete(&self) -> Result<Self::Outcome, PortalError>;

    /// Discard everything the customer entered
    fn reset(&mut self);
}

/// One running instance of a confirmation flow
pub struct Wizard<F: WizardForm> {
    form: F,
    step: WizardStep,
    errors: FieldErrors,
    verifier: Arc<dyn Verifier>,
    destination: String,
    session: String,
    masked_destination: Option<String>,
    entry: CodeEntry,
}

fn new_session() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl<F: WizardForm> Wizard<F> {
    /// Start a flow at the form step
    ///
    /// # Arguments
    ///
    /// * `form` - The flow's fields and rules
    /// * `verifier` - Issues and checks the two-factor codes
    /// * `destination` - Phone number or e-mail the code is sent to
    pub fn new(form: F, verifier: Arc<dyn Verifier>, destination: &str) -> Self {
        Wizard {
            form,
            step: WizardStep::Form,
            errors: FieldErrors::new(),
            verifier,
            destination: destination.to_string(),
            session: new_session(),
            masked_destination: None,
            entry: CodeEntry::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Mutable access to the fields
    ///
    /// Fields can be changed on the form step, and on the summary step for
    /// the checks it owns (terms, confirmations).
    pub fn form_mut(&mut self) -> Result<&mut F, PortalError> {
        match self.step {
            WizardStep::Form | WizardStep::Summary => Ok(&mut self.form),
            step => Err(PortalError::invalid_transition(step, "change fields")),
        }
    }

    /// Errors of the last rejected action, per field
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Session the current verification code belongs to
    pub fn session(&self) -> &str {
        &self.session
    }

    /// Where the last code was sent, masked for display
    pub fn masked_destination(&self) -> Option<&str> {
        self.masked_destination.as_deref()
    }

    pub fn entry(&self) -> &CodeEntry {
        &self.entry
    }

    /// Code entry slots, writable only while a code is expected
    pub fn entry_mut(&mut self) -> Result<&mut CodeEntry, PortalError> {
        self.require_step(WizardStep::TwoFactor, "enter a code")?;
        Ok(&mut self.entry)
    }

    fn require_step(&self, step: WizardStep, action: &str) -> Result<(), PortalError> {
        if self.step == step {
            Ok(())
        } else {
            Err(PortalError::invalid_transition(self.step, action))
        }
    }

    fn move_to(&mut self, step: WizardStep) {
        tracing::debug!("{} wizard: {} -> {}", self.form.flow_name(), self.step, step);
        self.step = step;
    }

    /// Validate the form and show the summary
    pub fn proceed(&mut self) -> Result<(), PortalError> {
        self.require_step(WizardStep::Form, "proceed")?;

        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            return Err(PortalError::validation(self.errors.clone()));
        }
        self.move_to(WizardStep::Summary);
        Ok(())
    }

    /// Go back from the summary to the form, keeping every value
    pub fn edit(&mut self) -> Result<(), PortalError> {
        self.require_step(WizardStep::Summary, "edit")?;
        self.errors.clear();
        self.move_to(WizardStep::Form);
        Ok(())
    }

    /// Run the summary checks and send a verification code
    ///
    /// A delivery failure keeps the wizard on the summary step with the
    /// reason recorded under the `verification` field.
    pub fn confirm(&mut self) -> Result<(), PortalError> {
        self.require_step(WizardStep::Summary, "confirm")?;

        self.errors = self.form.confirm();
        if !self.errors.is_empty() {
            return Err(PortalError::validation(self.errors.clone()));
        }

        self.send_code()?;
        self.move_to(WizardStep::TwoFactor);
        Ok(())
    }

    fn send_code(&mut self) -> Result<(), PortalError> {
        match self.verifier.send_code(&self.session, &self.destination) {
            Ok(masked) => {
                self.masked_destination = Some(masked);
                self.entry.clear();
                self.errors.clear();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    session = %self.session,
                    "{} wizard: could not send code: {}",
                    self.form.flow_name(),
                    e
                );
                self.errors.insert(VERIFICATION_FIELD, &e.to_string());
                Err(e)
            }
        }
    }

    /// Check the entered code
    ///
    /// An incomplete entry or a rejected code keeps the wizard on the
    /// two-factor step with a `verification` error and empty slots.
    pub fn verify(&mut self) -> Result<(), PortalError> {
        self.require_step(WizardStep::TwoFactor, "verify")?;

        if !self.entry.is_complete() {
            self.errors.insert(VERIFICATION_FIELD, INVALID_CODE_MESSAGE);
            return Err(PortalError::validation(self.errors.clone()));
        }

        match self.verifier.check_code(&self.session, &self.entry.as_string()) {
            Ok(()) => {
                self.errors.clear();
                self.move_to(WizardStep::Success);
                Ok(())
            }
            Err(e) => {
                let message = match e {
                    PortalError::InvalidCode { .. } => INVALID_CODE_MESSAGE.to_string(),
                    ref other => other.to_string(),
                };
                self.errors.insert(VERIFICATION_FIELD, &message);
                self.entry.clear();
                Err(e)
            }
        }
    }

    /// Send a new code, invalidating the previous one
    pub fn resend(&mut self) -> Result<(), PortalError> {
        self.require_step(WizardStep::TwoFactor, "resend")?;
        self.send_code()
    }

    /// Leave code entry and return to the summary
    pub fn back(&mut self) -> Result<(), PortalError> {
        self.require_step(WizardStep::TwoFactor, "go back")?;
        self.verifier.revoke(&self.session);
        self.entry.clear();
        self.errors.clear();
        self.move_to(WizardStep::Summary);
        Ok(())
    }

    /// Abandon the flow from any step and start over with an empty form
    pub fn close(&mut self) {
        self.verifier.revoke(&self.session);
        self.form.reset();
        self.errors.clear();
        self.entry.clear();
        self.masked_destination = None;
        self.session = new_session();
        self.move_to(WizardStep::Form);
    }

    /// Collect the outcome of a verified flow and start over
    pub fn finish(&mut self) -> Result<F::Outcome, PortalError> {
        self.require_step(WizardStep::Success, "finish")?;
        let outcome = self.form.complete()?;
        tracing::info!("{} wizard completed", self.form.flow_name());
        self.close();
        Ok(outcome)
    }
}

impl<F: WizardForm> Drop for Wizard<F> {
    fn drop(&mut self) {
        self.verifier.revoke(&self.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::verification::{CodeStore, DeliveryChannel};
    use rstest::rstest;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Outbox {
        codes: Mutex<Vec<String>>,
    }

    impl DeliveryChannel for Arc<Outbox> {
        fn deliver(&self, _destination: &str, code: &str) -> Result<(), PortalError> {
            self.codes.lock().unwrap().push(code.to_string());
            Ok(())
        }
    }

    impl Outbox {
        fn last(&self) -> String {
            self.codes.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[derive(Debug, Default)]
    struct NameForm {
        name: String,
        agreed: bool,
    }

    impl WizardForm for NameForm {
        type Outcome = String;

        fn flow_name(&self) -> &'static str {
            "name"
        }

        fn validate(&self) -> FieldErrors {
            let mut errors = FieldErrors::new();
            if self.name.trim().is_empty() {
                errors.insert("name", "Name is required");
            }
            errors
        }

        fn confirm(&self) -> FieldErrors {
            let mut errors = FieldErrors::new();
            if !self.agreed {
                errors.insert("terms", "Please accept the Terms and Conditions");
            }
            errors
        }

        fn complete(&self) -> Result<String, PortalError> {
            Ok(self.name.clone())
        }

        fn reset(&mut self) {
            *self = NameForm::default();
        }
    }

    fn wizard() -> (Wizard<NameForm>, Arc<Outbox>) {
        let outbox = Arc::new(Outbox::default());
        let store = Arc::new(CodeStore::new(outbox.clone()));
        (Wizard::new(NameForm::default(), store, "+31 612341234"), outbox)
    }

    fn enter(wizard: &mut Wizard<NameForm>, code: &str) {
        wizard.entry_mut().unwrap().fill(code);
    }

    fn at_two_factor() -> (Wizard<NameForm>, Arc<Outbox>) {
        let (mut w, outbox) = wizard();
        w.form_mut().unwrap().name = "Jan".to_string();
        w.proceed().unwrap();
        w.form_mut().unwrap().agreed = true;
        w.confirm().unwrap();
        (w, outbox)
    }

    #[test]
    fn test_empty_field_stays_on_form() {
        let (mut w, _) = wizard();
        let err = w.proceed().unwrap_err();

        assert!(matches!(err, PortalError::Validation { .. }));
        assert_eq!(w.step(), WizardStep::Form);
        assert_eq!(w.errors().get("name"), Some("Name is required"));
    }

    #[test]
    fn test_edit_keeps_values() {
        let (mut w, _) = wizard();
        w.form_mut().unwrap().name = "Jan".to_string();
        w.proceed().unwrap();
        assert_eq!(w.step(), WizardStep::Summary);

        w.edit().unwrap();
        assert_eq!(w.step(), WizardStep::Form);
        assert_eq!(w.form().name, "Jan");
        assert!(w.errors().is_empty());
    }

    #[test]
    fn test_summary_check_blocks_confirm() {
        let (mut w, outbox) = wizard();
        w.form_mut().unwrap().name = "Jan".to_string();
        w.proceed().unwrap();

        assert!(w.confirm().is_err());
        assert_eq!(w.step(), WizardStep::Summary);
        assert!(w.errors().contains("terms"));
        assert!(outbox.codes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_confirm_sends_code_and_masks_destination() {
        let (w, outbox) = at_two_factor();
        assert_eq!(w.step(), WizardStep::TwoFactor);
        assert_eq!(w.masked_destination(), Some("+31 6****1234"));
        assert_eq!(outbox.codes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_issued_code_reaches_success() {
        let (mut w, outbox) = at_two_factor();
        enter(&mut w, &outbox.last());
        w.verify().unwrap();
        assert_eq!(w.step(), WizardStep::Success);

        assert_eq!(w.finish().unwrap(), "Jan");
        assert_eq!(w.step(), WizardStep::Form);
        assert!(w.form().name.is_empty());
    }

    #[test]
    fn test_wrong_code_stays_with_error() {
        let (mut w, outbox) = at_two_factor();
        let wrong = if outbox.last() == "000000" { "999999" } else { "000000" };
        enter(&mut w, wrong);

        assert!(w.verify().is_err());
        assert_eq!(w.step(), WizardStep::TwoFactor);
        assert_eq!(w.errors().get(VERIFICATION_FIELD), Some(INVALID_CODE_MESSAGE));
        assert!(!w.entry().is_complete());
    }

    #[test]
    fn test_incomplete_entry_is_rejected() {
        let (mut w, _) = at_two_factor();
        enter(&mut w, "123");
        assert!(w.verify().is_err());
        assert_eq!(w.step(), WizardStep::TwoFactor);
        assert!(w.errors().contains(VERIFICATION_FIELD));
    }

    #[test]
    fn test_resend_invalidates_old_code() {
        let (mut w, outbox) = at_two_factor();
        let first = outbox.last();
        w.resend().unwrap();
        let second = outbox.last();

        if first != second {
            enter(&mut w, &first);
            assert!(w.verify().is_err());
        }
        enter(&mut w, &second);
        w.verify().unwrap();
        assert_eq!(w.step(), WizardStep::Success);
    }

    #[test]
    fn test_back_returns_to_summary() {
        let (mut w, outbox) = at_two_factor();
        let code = outbox.last();
        enter(&mut w, "12");
        w.back().unwrap();

        assert_eq!(w.step(), WizardStep::Summary);
        assert_eq!(w.entry().as_string(), "");

        w.confirm().unwrap();
        if outbox.last() != code {
            enter(&mut w, &code);
            assert!(w.verify().is_err());
        }
    }

    #[rstest]
    #[case(WizardStep::Form)]
    #[case(WizardStep::Summary)]
    #[case(WizardStep::TwoFactor)]
    fn test_close_from_any_step_resets(#[case] step: WizardStep) {
        let (mut w, _) = at_two_factor();
        if step != WizardStep::TwoFactor {
            w.back().unwrap();
        }
        if step == WizardStep::Form {
            w.edit().unwrap();
        }
        assert_eq!(w.step(), step);

        let old_session = w.session().to_string();
        w.close();
        assert_eq!(w.step(), WizardStep::Form);
        assert!(w.form().name.is_empty());
        assert!(w.masked_destination().is_none());
        assert_ne!(w.session(), old_session);
    }

    #[test]
    fn test_dropping_wizard_revokes_pending_code() {
        let outbox = Arc::new(Outbox::default());
        let store = Arc::new(CodeStore::new(outbox.clone()));
        let mut w = Wizard::new(
            NameForm {
                name: "Jan".to_string(),
                agreed: true,
            },
            store.clone(),
            "+31 612341234",
        );
        w.proceed().unwrap();
        w.confirm().unwrap();
        assert_eq!(store.pending_count(), 1);

        drop(w);
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_invalid_transitions_leave_state_unchanged() {
        let (mut w, _) = wizard();
        assert_eq!(
            w.confirm().unwrap_err(),
            PortalError::invalid_transition(WizardStep::Form, "confirm")
        );
        assert!(w.verify().is_err());
        assert!(w.back().is_err());
        assert!(w.finish().is_err());
        assert!(w.entry_mut().is_err());
        assert_eq!(w.step(), WizardStep::Form);

        let (mut w, _) = at_two_factor();
        assert!(w.proceed().is_err());
        assert!(w.edit().is_err());
        assert!(w.form_mut().is_err());
        assert_eq!(w.step(), WizardStep::TwoFactor);
    }
}
