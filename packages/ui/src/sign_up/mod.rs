//! Sign-up page: form model, controller and view.

mod component;
mod controller;
mod form;

pub use component::SignUp;
pub use controller::{AuthService, AuthStore, Navigator, PendingRegistration, SignUpController};
pub use form::{FieldState, SignUpForm, Submission, SubmissionState, SyntheticError};
