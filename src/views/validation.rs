//! Form field validation.
//!
//! Views collect field errors with [`FieldErrors`]; a form may only be
//! submitted when the collection is empty.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::FORM_DATE_FORMAT;

lazy_static! {
    /// Loose email shape check, the server does the real validation
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*$"
    ).unwrap();
}

/// Per-field error messages, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Record `result`'s error, if any, against `field`
    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.add(field, message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("is required".to_string())
    } else {
        Ok(())
    }
}

/// Length bounds, counted in characters
pub fn length(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        Err(format!("must be at least {} characters", min))
    } else if len > max {
        Err(format!("must be at most {} characters", max))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> Result<(), String> {
    required(value)?;
    if EMAIL_REGEX.is_match(value.trim()) {
        Ok(())
    } else {
        Err("must be a valid email address".to_string())
    }
}

/// Parse the form's `YYYY-MM-DD` date text
pub fn form_date(value: &str) -> Result<NaiveDate, String> {
    required(value)?;
    NaiveDate::parse_from_str(value.trim(), FORM_DATE_FORMAT)
        .map_err(|_| "must be a date formatted YYYY-MM-DD".to_string())
}
