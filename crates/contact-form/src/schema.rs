// File: src/schema.rs
// Purpose: Validation schema mapping form values to per-field error messages

use crate::field::{Field, FormValues};
use contact_form_validation::{is_blank, is_valid_email, validate_max_length, validate_min_length};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NAME_REQUIRED: &str = "Must enter a name";
pub const NAME_TOO_SHORT: &str = "Must have a character";
pub const NAME_TOO_LONG: &str = "Must be shorter than 10";
pub const EMAIL_REQUIRED: &str = "Must enter an email";
pub const EMAIL_INVALID: &str = "Must be a valid email";
pub const COUNTRY_REQUIRED: &str = "Must select a country";

const NAME_MIN_CHARS: usize = 1;
const NAME_MAX_CHARS: usize = 10;

/// Error messages keyed by field; a field absent from the map is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    errors: BTreeMap<Field, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Get the error message for a field
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(|s| s.as_str())
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Trait for types that can be validated into per-field errors
pub trait Validate {
    /// Returns Ok(()) if valid, or Err with the failing fields' messages
    fn validate(&self, values: &FormValues) -> Result<(), FormErrors>;
}

/// Per-field rules for the contact form
///
/// Rules are evaluated independently per field and the first failing rule
/// supplies the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSchema {
    require_country: bool,
}

impl ValidationSchema {
    /// Schema for the name/email form
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema for the variant with the country autosuggest
    pub fn with_country() -> Self {
        Self { require_country: true }
    }

    pub fn requires_country(&self) -> bool {
        self.require_country
    }

    /// Fields this schema renders and validates, in order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(move |f| *f != Field::Country || self.require_country)
    }

    /// Evaluate the rule for a single field
    pub fn check(&self, field: Field, values: &FormValues) -> Option<&'static str> {
        match field {
            Field::Name => check_name(&values.name),
            Field::Email => check_email(&values.email),
            Field::Country if self.require_country => check_country(values.country.as_deref()),
            Field::Country => None,
        }
    }

    /// Compute every field's error; pure function of the values
    pub fn errors(&self, values: &FormValues) -> FormErrors {
        let mut errors = FormErrors::new();
        for field in self.fields() {
            if let Some(message) = self.check(field, values) {
                errors.insert(field, message);
            }
        }
        errors
    }
}

impl Validate for ValidationSchema {
    fn validate(&self, values: &FormValues) -> Result<(), FormErrors> {
        let errors = self.errors(values);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some(NAME_REQUIRED);
    }
    if validate_min_length(name, NAME_MIN_CHARS).is_err() {
        return Some(NAME_TOO_SHORT);
    }
    if validate_max_length(name, NAME_MAX_CHARS).is_err() {
        return Some(NAME_TOO_LONG);
    }
    None
}

fn check_email(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some(EMAIL_REQUIRED);
    }
    if !is_valid_email(email) {
        return Some(EMAIL_INVALID);
    }
    None
}

fn check_country(country: Option<&str>) -> Option<&'static str> {
    match country {
        Some(c) if !is_blank(c) => None,
        _ => Some(COUNTRY_REQUIRED),
    }
}
