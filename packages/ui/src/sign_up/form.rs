//! # Sign-up form model
//!
//! [`SignUpForm`] owns one [`FieldState`] per [`FieldName`], each carrying the
//! field's value, its validation rules, a `touched` flag and an optional
//! [`SyntheticError`]. A synthetic error is injected by the submission logic
//! rather than produced by a rule; while present it replaces the field's rule
//! results and makes the field invalid. Editing the field clears it.
//!
//! Submission runs through [`SubmissionState`]:
//!
//! ```text
//! Idle -> Submitting -> Succeeded
//!                    -> ServerRejected
//!      -> LocallyRejected
//! ```
//!
//! Validation itself happens synchronously inside [`SignUpForm::submit`]. The
//! three end states fall back to `Idle` on the next edit.

use api::validation::{self, ValidationError};
use api::{FieldName, RegisterError, SignUpValues, UserInfo};

/// An error attached by application logic. `msg: None` asks the view for a
/// generic indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticError {
    pub msg: Option<String>,
}

/// Value, rules and error state of one form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    name: FieldName,
    value: String,
    touched: bool,
    synthetic: Option<SyntheticError>,
}

impl FieldState {
    fn new(field: FieldName) -> Self {
        Self {
            name: field,
            value: String::new(),
            touched: false,
            synthetic: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn synthetic_error(&self) -> Option<&SyntheticError> {
        self.synthetic.as_ref()
    }

    /// Failures of the field's own rules, ignoring any synthetic error.
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        validation::validate(self.name, &self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.synthetic.is_none() && self.validation_errors().is_empty()
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
        self.synthetic = None;
    }

    fn set_error(&mut self, msg: Option<String>) {
        self.synthetic = Some(SyntheticError { msg });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    ServerRejected,
    LocallyRejected,
}

impl SubmissionState {
    fn is_terminal(self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded
                | SubmissionState::ServerRejected
                | SubmissionState::LocallyRejected
        )
    }
}

/// Result of [`SignUpForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Everything passed; register these values.
    Valid(SignUpValues),
    /// Fields that failed their own rules. May be empty when only the
    /// password mismatch rule failed.
    Invalid(Vec<FieldName>),
}

/// The registration form.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpForm {
    fields: [FieldState; 5],
    submitted: bool,
    state: SubmissionState,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SignUpForm {
    /// Build the form with every field empty.
    pub fn new() -> Self {
        Self {
            fields: FieldName::ALL.map(FieldState::new),
            submitted: false,
            state: SubmissionState::Idle,
        }
    }

    pub fn field(&self, name: FieldName) -> &FieldState {
        &self.fields[name as usize]
    }

    fn field_mut(&mut self, name: FieldName) -> &mut FieldState {
        &mut self.fields[name as usize]
    }

    /// Apply a user edit.
    pub fn set_value(&mut self, name: FieldName, value: impl Into<String>) {
        self.field_mut(name).set_value(value.into());
        if self.state.is_terminal() {
            self.state = SubmissionState::Idle;
        }
    }

    pub fn mark_touched(&mut self, name: FieldName) {
        self.field_mut(name).touched = true;
    }

    pub fn values(&self) -> SignUpValues {
        let mut values = SignUpValues::default();
        for field in FieldName::ALL {
            values.set(field, self.field(field).value.clone());
        }
        values
    }

    /// The form-level "mismatchedPasswords" rule.
    pub fn mismatched_passwords(&self) -> bool {
        validation::mismatched_passwords(
            self.field(FieldName::Password).value(),
            self.field(FieldName::PasswordConfirmation).value(),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldState::is_valid) && !self.mismatched_passwords()
    }

    /// Whether a submission has been attempted.
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Validate the form for submission.
    ///
    /// Valid forms move to `Submitting`. Otherwise every failing field gets a
    /// message-less synthetic error and is marked touched.
    pub fn submit(&mut self) -> Submission {
        self.submitted = true;

        if self.is_valid() {
            self.state = SubmissionState::Submitting;
            return Submission::Valid(self.values());
        }

        let invalid: Vec<FieldName> = FieldName::ALL
            .into_iter()
            .filter(|&field| !self.field(field).is_valid())
            .collect();
        for &field in &invalid {
            let state = self.field_mut(field);
            state.set_error(None);
            state.touched = true;
        }
        self.state = SubmissionState::LocallyRejected;
        tracing::debug!(?invalid, mismatched = self.mismatched_passwords(), "Sign-up rejected locally");
        Submission::Invalid(invalid)
    }

    /// Record the outcome of the registration call.
    pub fn complete_registration(&mut self, outcome: Result<UserInfo, RegisterError>) {
        match outcome {
            Ok(_) => self.state = SubmissionState::Succeeded,
            Err(rejection) => self.apply_server_errors(&rejection),
        }
    }

    /// Attach the first server message of each known field. Unknown keys and
    /// empty message lists are dropped.
    pub fn apply_server_errors(&mut self, rejection: &RegisterError) {
        for field in FieldName::ALL {
            if let Some(msg) = rejection.first_message(field) {
                self.field_mut(field).set_error(Some(msg.to_string()));
            }
        }

        let ignored: Vec<&str> = rejection
            .errors
            .keys()
            .map(String::as_str)
            .filter(|key| FieldName::from_key(key).is_none())
            .collect();
        if !ignored.is_empty() {
            tracing::warn!(?ignored, "Dropping server errors for unknown fields");
        }

        self.state = SubmissionState::ServerRejected;
    }

    /// Whether the view should reveal the field's error state.
    pub fn show_error(&self, name: FieldName) -> bool {
        let field = self.field(name);
        (field.touched || self.submitted) && !field.is_valid()
    }

    /// Message to display under the field, if any. Synthetic errors win over
    /// rule failures; a message-less synthetic error falls back to the first
    /// rule failure, if there is one.
    pub fn error_message(&self, name: FieldName) -> Option<String> {
        let field = self.field(name);
        if let Some(SyntheticError { msg: Some(msg) }) = &field.synthetic {
            return Some(msg.clone());
        }
        field
            .validation_errors()
            .first()
            .map(|error| format!("{} {}", name.label(), error))
    }
}
