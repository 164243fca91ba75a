// File: src/field.rs
// Purpose: Form fields and the values the user has typed into them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A field of the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Country,
}

impl Field {
    /// All fields in declaration order
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Country];

    /// Wire name used for `name=` / `id=` attributes and routes
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Country => "country",
        }
    }

    /// Human label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Country => "Country",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Name => "enter name",
            Field::Email => "enter email",
            Field::Country => "type a country",
        }
    }

    /// HTML input type
    pub fn input_type(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Name | Field::Country => "text",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wire name does not match any field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "country" => Ok(Field::Country),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Current values of the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl FormValues {
    /// Empty values, as on mount
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field as text; an unset country reads as ""
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Country => self.country.as_deref().unwrap_or(""),
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Country => self.country = Some(value),
        }
    }

    /// Pretty JSON, as shown to the user after a submit
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_round_trips_wire_name() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>(), Ok(field));
        }
    }

    #[test]
    fn test_unknown_field() {
        let err = "phone".parse::<Field>().unwrap_err();
        assert_eq!(err.to_string(), "unknown form field 'phone'");
    }

    #[test]
    fn test_values_start_empty() {
        let values = FormValues::new();
        for field in Field::ALL {
            assert_eq!(values.get(field), "");
        }
        assert_eq!(values.country, None);
    }

    #[test]
    fn test_set_and_get() {
        let mut values = FormValues::new();
        values.set(Field::Name, "Ada");
        values.set(Field::Country, "France");
        assert_eq!(values.get(Field::Name), "Ada");
        assert_eq!(values.country.as_deref(), Some("France"));
    }

    #[test]
    fn test_json_omits_unset_country() {
        let values = FormValues {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            country: None,
        };
        let json = values.to_pretty_json();
        assert!(json.contains("\"name\": \"Ada\""));
        assert!(!json.contains("country"));
    }
}
