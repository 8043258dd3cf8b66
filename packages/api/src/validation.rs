//! # Field validation rules for the sign-up form
//!
//! The same rules run in two places: the browser validates every keystroke
//! through the form model in the `ui` crate, and the `register` server function
//! re-runs them before touching the database. Both sides go through
//! [`FieldName::rules`] so they cannot drift apart.
//!
//! Only [`Rule::Required`] rejects an empty value. Every other rule accepts the
//! empty string so that an untouched field reports a single "required" failure
//! instead of a pile of them.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{FieldName, RegisterError, SignUpValues};

const EMAIL_MAX_LENGTH: usize = 254;
const EMAIL_LOCAL_MAX_LENGTH: usize = 64;

// Dot-separated atoms, `@`, then hostname labels that neither start nor end
// with a hyphen. Overall and local-part lengths are checked separately.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("EMAIL_REGEX: invalid regex pattern")
});

const MOBILE_PATTERN: &str = "[0-9]{10}";

static MOBILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{MOBILE_PATTERN})$")).expect("MOBILE_REGEX: invalid regex pattern")
});

static EMAIL_RULES: [Rule; 2] = [Rule::Required, Rule::Email];
static PASSWORD_RULES: [Rule; 2] = [Rule::Required, Rule::MinLength(6)];
static MOBILE_RULES: [Rule; 4] = [
    Rule::Required,
    Rule::MinLength(10),
    Rule::MaxLength(10),
    Rule::Pattern {
        source: MOBILE_PATTERN,
        regex: &MOBILE_REGEX,
    },
];
static GENDER_RULES: [Rule; 1] = [Rule::Required];

/// A single-field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("can't be blank")]
    Required,
    #[error("is invalid")]
    Email,
    #[error("is too short (minimum is {required} characters)")]
    MinLength { required: usize, actual: usize },
    #[error("is too long (maximum is {required} characters)")]
    MaxLength { required: usize, actual: usize },
    #[error("is invalid")]
    Pattern { pattern: &'static str },
}

/// A per-field validation rule.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    /// Must match `source` over the whole value.
    Pattern {
        source: &'static str,
        regex: &'static LazyLock<Regex>,
    },
}

impl Rule {
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return match self {
                Rule::Required => Err(ValidationError::Required),
                _ => Ok(()),
            };
        }

        match *self {
            Rule::Required => Ok(()),
            Rule::Email if is_email(value) => Ok(()),
            Rule::Email => Err(ValidationError::Email),
            Rule::MinLength(required) => {
                let actual = value.chars().count();
                if actual < required {
                    Err(ValidationError::MinLength { required, actual })
                } else {
                    Ok(())
                }
            }
            Rule::MaxLength(required) => {
                let actual = value.chars().count();
                if actual > required {
                    Err(ValidationError::MaxLength { required, actual })
                } else {
                    Ok(())
                }
            }
            Rule::Pattern { source, regex } => {
                if regex.is_match(value) {
                    Ok(())
                } else {
                    Err(ValidationError::Pattern { pattern: source })
                }
            }
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LENGTH {
        return false;
    }
    match value.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_MAX_LENGTH => EMAIL_REGEX.is_match(value),
        _ => false,
    }
}

impl FieldName {
    /// Rules attached to this field when the form is built.
    pub fn rules(self) -> &'static [Rule] {
        match self {
            FieldName::Email => &EMAIL_RULES,
            FieldName::Password | FieldName::PasswordConfirmation => &PASSWORD_RULES,
            FieldName::Mobile => &MOBILE_RULES,
            FieldName::Gender => &GENDER_RULES,
        }
    }
}

/// Run every rule of `field`, collecting all failures.
pub fn validate(field: FieldName, value: &str) -> Vec<ValidationError> {
    field
        .rules()
        .iter()
        .filter_map(|rule| rule.check(value).err())
        .collect()
}

/// The form-level "mismatchedPasswords" rule. True means invalid.
pub fn mismatched_passwords(password: &str, confirmation: &str) -> bool {
    password != confirmation
}

/// Server-side validation of a whole submission, in the shape the client
/// reconciles onto its fields.
pub fn validate_sign_up(values: &SignUpValues) -> RegisterError {
    let mut rejection = RegisterError::default();
    for field in FieldName::ALL {
        for error in validate(field, values.get(field)) {
            rejection.add(field, error.to_string());
        }
    }
    if !values.password_confirmation.is_empty()
        && mismatched_passwords(&values.password, &values.password_confirmation)
    {
        rejection.add(FieldName::PasswordConfirmation, "doesn't match Password");
    }
    rejection
}
