//! Form validation shared by the command-line client and the browser.
//!
//! Every form validates into the request body it produces, so an invalid form
//! can never reach the API.

use std::fmt;
use std::sync::LazyLock;

use email_address::EmailAddress;
use regex::Regex;
use thiserror::Error;

use crate::models::{
    Address, LoginRequest, Patient, RegisterRequest, RenewPasswordRequest, RequestPatient,
    UpdateUserRequest,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_REGISTER_NAME_LEN: usize = 2;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\- ]{8,14}$").expect("valid phone pattern"));

/// Dotted host name with at least two labels.
static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("valid domain pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors of one form, in field order.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", join_errors(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message for `field`, for inline display next to an input.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// A bare address (no display name) whose domain is a dotted host name.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.parse::<EmailAddress>() {
        Ok(address) => address.email() == email && DOMAIN_PATTERN.is_match(&address.domain()),
        Err(_) => false,
    }
}

/// 8 to 14 characters of digits, hyphens and spaces.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// The numeric form the API stores. Separators are dropped.
pub fn phone_digits(phone: &str) -> Option<u64> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "is required");
    }
}

fn require_min(errors: &mut ValidationErrors, field: &'static str, value: &str, min: usize) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.add(field, "is required");
    } else if len < min {
        errors.add(field, format!("must be at least {} characters", min));
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.add("email", "is required");
    } else if !is_valid_email(email) {
        errors.add("email", "must be a valid email address");
    }
}

fn check_passwords(errors: &mut ValidationErrors, password: &str, repeated: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
    if password != repeated {
        errors.add("repeatedPassword", "passwords do not match");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    pub state: String,
    pub city: String,
    pub avenue: String,
}

impl From<&Patient> for PatientForm {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            surname: patient.surname.clone(),
            phone_number: patient.phone_number.clone(),
            state: patient.address.state.clone(),
            city: patient.address.city.clone(),
            avenue: patient.address.avenue.clone(),
        }
    }
}

impl PatientForm {
    pub fn validate(&self) -> Result<RequestPatient, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "surname", &self.surname);

        let phone = self.phone_number.trim();
        let digits = phone_digits(phone);
        if phone.is_empty() {
            errors.add("phoneNumber", "is required");
        } else if !is_valid_phone(phone) || digits.is_none() {
            errors.add(
                "phoneNumber",
                "must be 8 to 14 digits, hyphens or spaces",
            );
        }

        require(&mut errors, "state", &self.state);
        require(&mut errors, "city", &self.city);
        require(&mut errors, "avenue", &self.avenue);

        errors.into_result(|| RequestPatient {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            phone_number: digits.unwrap_or_default(),
            address: Address {
                state: self.state.trim().to_string(),
                city: self.city.trim().to_string(),
                avenue: self.avenue.trim().to_string(),
                id: None,
            },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub repeated_password: String,
    pub terms: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_min(&mut errors, "name", &self.name, MIN_REGISTER_NAME_LEN);
        require_min(&mut errors, "surname", &self.surname, MIN_REGISTER_NAME_LEN);
        check_email(&mut errors, &self.email);
        check_passwords(&mut errors, &self.password, &self.repeated_password);
        if !self.terms {
            errors.add("terms", "must be accepted");
        }

        errors.into_result(|| RegisterRequest {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            repeated_password: self.repeated_password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add("password", "is required");
        }

        errors.into_result(|| LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub surname: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<UpdateUserRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "surname", &self.surname);
        check_email(&mut errors, &self.email);

        errors.into_result(|| UpdateUserRequest {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub password: String,
    pub repeated_password: String,
}

impl PasswordForm {
    pub fn validate(&self) -> Result<RenewPasswordRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_passwords(&mut errors, &self.password, &self.repeated_password);

        errors.into_result(|| RenewPasswordRequest {
            password: self.password.clone(),
            repeated_password: self.repeated_password.clone(),
        })
    }
}

/// Exactly one file, and it must be an image.
pub fn validate_avatar(mime_types: &[&str]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    match mime_types {
        [] => errors.add("file", "an image is required"),
        [mime] if !mime.starts_with("image/") => errors.add("file", "must be an image"),
        [_] => {}
        _ => errors.add("file", "only one file can be uploaded"),
    }
    errors.into_result(|| ())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;
