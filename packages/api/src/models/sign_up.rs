//! # Sign-up payloads shared by client and server
//!
//! - [`FieldName`] — the fixed set of sign-up fields. Form construction, the
//!   registration payload and error reconciliation all iterate
//!   [`FieldName::ALL`], never the keys of a runtime map.
//! - [`SignUpValues`] — the values submitted to the `register` server function.
//! - [`RegisterError`] — a rejected registration: field name → ordered list of
//!   human-readable messages. Keys are plain strings on the wire because the
//!   server may report fields the client does not know about.
//! - [`RegisterResponse`] — what the server function returns. A rejection is a
//!   normal response, not a transport error, so its payload survives the trip.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserInfo;

/// One of the sign-up form fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Email,
    Password,
    PasswordConfirmation,
    Mobile,
    Gender,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Email,
        FieldName::Password,
        FieldName::PasswordConfirmation,
        FieldName::Mobile,
        FieldName::Gender,
    ];

    /// Wire name, as used in payloads and server error maps.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Email => "email",
            FieldName::Password => "password",
            FieldName::PasswordConfirmation => "password_confirmation",
            FieldName::Mobile => "mobile",
            FieldName::Gender => "gender",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }

    /// Human-readable label for the view.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Email => "Email",
            FieldName::Password => "Password",
            FieldName::PasswordConfirmation => "Confirm Password",
            FieldName::Mobile => "Mobile",
            FieldName::Gender => "Gender",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values submitted for registration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpValues {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub mobile: String,
    pub gender: String,
}

impl SignUpValues {
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Email => &self.email,
            FieldName::Password => &self.password,
            FieldName::PasswordConfirmation => &self.password_confirmation,
            FieldName::Mobile => &self.mobile,
            FieldName::Gender => &self.gender,
        }
    }

    pub fn set(&mut self, field: FieldName, value: String) {
        let slot = match field {
            FieldName::Email => &mut self.email,
            FieldName::Password => &mut self.password,
            FieldName::PasswordConfirmation => &mut self.password_confirmation,
            FieldName::Mobile => &mut self.mobile,
            FieldName::Gender => &mut self.gender,
        };
        *slot = value;
    }

    /// Canonical form stored by the server: trimmed, lowercased email and
    /// trimmed mobile number. Passwords are left untouched.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_lowercase();
        self.mobile = self.mobile.trim().to_string();
        self.gender = self.gender.trim().to_string();
        self
    }
}

/// Field-level errors returned when the server refuses a registration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("registration rejected")]
pub struct RegisterError {
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl RegisterError {
    pub fn add(&mut self, field: FieldName, message: impl Into<String>) {
        self.errors
            .entry(field.as_str().to_string())
            .or_default()
            .push(message.into());
    }

    /// First message reported for `field`, if any.
    pub fn first_message(&self, field: FieldName) -> Option<&str> {
        self.errors
            .get(field.as_str())
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.values().all(Vec::is_empty)
    }
}

/// Outcome of the `register` server function.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RegisterResponse {
    Registered(UserInfo),
    Rejected(RegisterError),
}

impl RegisterResponse {
    pub fn into_result(self) -> Result<UserInfo, RegisterError> {
        match self {
            RegisterResponse::Registered(user) => Ok(user),
            RegisterResponse::Rejected(rejection) => Err(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_roundtrip() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_key(field.as_str()), Some(field));
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
        assert_eq!(FieldName::from_key("username"), None);
    }

    #[test]
    fn test_values_wire_format() {
        let mut values = SignUpValues::default();
        values.set(FieldName::PasswordConfirmation, "secret1".to_string());
        values.set(FieldName::Mobile, "1234567890".to_string());

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json["password_confirmation"], "secret1");
        assert_eq!(json["mobile"], "1234567890");
        assert_eq!(values.get(FieldName::Email), "");
    }

    #[test]
    fn test_normalized() {
        let values = SignUpValues {
            email: "  Someone@Example.COM ".into(),
            password: " keep spaces ".into(),
            mobile: " 1234567890\n".into(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(values.email, "someone@example.com");
        assert_eq!(values.password, " keep spaces ");
        assert_eq!(values.mobile, "1234567890");
    }

    #[test]
    fn test_register_error_from_server_payload() {
        let rejection: RegisterError = serde_json::from_str(
            r#"{"errors":{"email":["already taken","is invalid"],"nickname":["nope"],"mobile":[]}}"#,
        )
        .unwrap();
        assert_eq!(rejection.first_message(FieldName::Email), Some("already taken"));
        assert_eq!(rejection.first_message(FieldName::Mobile), None);
        assert!(!rejection.is_empty());

        let missing: RegisterError = serde_json::from_str("{}").unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_response_into_result() {
        let mut rejection = RegisterError::default();
        rejection.add(FieldName::Email, "has already been taken");
        let response = RegisterResponse::Rejected(rejection.clone());
        assert_eq!(response.into_result(), Err(rejection));
    }
}
