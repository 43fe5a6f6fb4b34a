//! Client-side validation schemas for the login, registration and todo forms.
//!
//! # Design
//! Each form has a draft type holding the raw field values. Validating a
//! draft either yields the normalized payload the gateway accepts, or the
//! full list of field-level errors. Validation is synchronous and runs before
//! any request is built, so a rejected draft never touches the network.
//! There are no cross-field rules.

use std::fmt;

use thiserror::Error;

use crate::types::{Credentials, TodoInput};

pub const TITLE_MIN: usize = 2;
pub const TITLE_MAX: usize = 50;
pub const REGISTRATION_MIN: usize = 5;
pub const REGISTRATION_MAX: usize = 50;

/// A single failed rule on a single field.
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

/// Every field error found in one draft. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// First message recorded for `field`.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// A draft that can be checked and turned into its request payload.
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, ValidationErrors>;
}

/// Collects field errors; one entry per failing field.
#[derive(Debug, Default)]
struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    fn check(mut self, field: &'static str, outcome: Result<(), String>) -> Self {
        if let Err(message) = outcome {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    fn build(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Checks `value` has between `min` and `max` characters, inclusive.
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        return Err(format!("must be at least {min} characters"));
    }
    if len > max {
        return Err(format!("must be at most {max} characters"));
    }
    Ok(())
}

fn validate_required(value: &str, message: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

fn validate_credential(value: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < REGISTRATION_MIN {
        Err(format!("min {REGISTRATION_MIN} characters"))
    } else if len > REGISTRATION_MAX {
        Err(format!("max {REGISTRATION_MAX} characters"))
    } else {
        Ok(())
    }
}

/// Raw values of the add/edit todo form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoDraft {
    pub title: String,
    pub completed: Option<bool>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self {
            title: title.into(),
            completed: Some(completed),
        }
    }
}

impl Validate for TodoDraft {
    type Output = TodoInput;

    fn validate(&self) -> Result<TodoInput, ValidationErrors> {
        ValidationBuilder::default()
            .check("title", validate_length(&self.title, TITLE_MIN, TITLE_MAX))
            .check(
                "completed",
                self.completed.map(|_| ()).ok_or_else(|| "Required".to_string()),
            )
            .build()?;

        Ok(TodoInput {
            title: self.title.clone(),
            completed: self.completed.unwrap_or_default(),
        })
    }
}

/// Raw values of the login form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginDraft {
    pub username: String,
    pub password: String,
}

impl Validate for LoginDraft {
    type Output = Credentials;

    fn validate(&self) -> Result<Credentials, ValidationErrors> {
        ValidationBuilder::default()
            .check("username", validate_required(&self.username, "Username is required"))
            .check("password", validate_required(&self.password, "Password is required"))
            .build()?;

        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

/// Raw values of the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationDraft {
    pub username: String,
    pub password: String,
}

impl Validate for RegistrationDraft {
    type Output = Credentials;

    fn validate(&self) -> Result<Credentials, ValidationErrors> {
        ValidationBuilder::default()
            .check("username", validate_credential(&self.username))
            .check("password", validate_credential(&self.password))
            .build()?;

        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}
