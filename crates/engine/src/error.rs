//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when the input is malformed, carries one message
//!   list per field path.
//! - [`KeyNotFound`] thrown when a budget, item or user does not exist.
//! - [`Forbidden`] thrown when the principal lacks access to an existing
//!   resource.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
use std::{collections::BTreeMap, fmt};

use sea_orm::DbErr;
use thiserror::Error;

pub(crate) const REQUIRED: &str = "This field is required.";

/// Validation failures keyed by field path, e.g. `incomes[1].category`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for an error on a single field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Error for a field the client left out.
    pub fn required(field: impl Into<String>) -> Self {
        Self::single(field, REQUIRED)
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Moves every error of `other` under `prefix` (`amount` becomes
    /// `incomes[2].amount`).
    pub fn nest(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(messages);
        }
    }

    /// Adds every error of `other` under its own field name.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid credentials")]
    Credentials,
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<ValidationErrors> for EngineError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Credentials, Self::Credentials) => true,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a == b,
            (Self::InvalidData(a), Self::InvalidData(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nest_prefixes_field_paths() {
        let mut inner = ValidationErrors::new();
        inner.add("category", "\"RENT\" is not a valid choice.");
        inner.add("amount", "A valid number is required.");

        let mut outer = ValidationErrors::single("name", "This field may not be blank.");
        outer.nest("incomes[1]", inner);

        assert!(outer.contains("name"));
        assert!(outer.contains("incomes[1].category"));
        assert!(outer.contains("incomes[1].amount"));
        assert!(!outer.contains("category"));
    }

    #[test]
    fn display_lists_every_message() {
        let mut errors = ValidationErrors::single("amount", "too many decimals");
        errors.add("amount", "out of range");
        assert_eq!(
            errors.to_string(),
            "amount: too many decimals; amount: out of range"
        );
    }

    #[test]
    fn required_field_message() {
        let errors = ValidationErrors::required("budget");
        assert_eq!(
            errors.fields().get("budget"),
            Some(&vec!["This field is required.".to_string()])
        );
    }
}
