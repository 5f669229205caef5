//! Per-field validation primitives
//!
//! Submissions reach the core as a flat map of field names to raw strings,
//! the same shape an HTML form posts. Validation happens in two steps:
//!
//! 1. [`FieldReader`] parses raw strings into typed values, recording a
//!    message for every field that is missing or malformed.
//! 2. The typed draft is checked with the `validator` derive (lengths,
//!    ranges, email syntax) and the resulting `ValidationErrors` are folded
//!    into the same [`FieldErrors`] map.
//!
//! Nothing in this module panics on bad input; every problem ends up as a
//! message attached to the field that caused it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

use crate::money::check_premium_precision;

/// Raw submitted values keyed by field name
pub type FieldMap = BTreeMap<String, String>;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const INVALID_INTEGER: &str = "Enter a whole number.";
pub const INVALID_NUMBER: &str = "Enter a number.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const NEGATIVE_VALUE: &str = "Ensure this value is greater than or equal to 0.";

/// Per-field validation messages, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Creates an empty error map
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a message to a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns true if no field has a message
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns true if the field has at least one message
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the names of every field with a message
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Merges another map into this one
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// Returns the inner map
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }

    /// Folds `validator` errors into a map keyed by submitted field names
    ///
    /// `names` pairs each struct field with the form field it was read from.
    /// Struct fields missing from `names` keep their own name.
    pub fn from_validation(errors: ValidationErrors, names: &[(&str, &str)]) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            let field: &str = &field;
            let key = names
                .iter()
                .find(|(struct_field, _)| *struct_field == field)
                .map_or(field, |(_, form_field)| *form_field)
                .to_string();
            for error in field_errors {
                out.add(key.clone(), describe(error));
            }
        }
        out
    }

    /// Turns the map into a `Result`, succeeding with `value` when empty
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        FieldErrors::from_validation(errors, &[])
    }
}

/// Renders a single `validator` error as a user-facing message
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "email" => INVALID_EMAIL.to_string(),
        "length" => match error.params.get("max") {
            Some(max) => format!("Ensure this value has at most {} characters.", max),
            None => REQUIRED.to_string(),
        },
        "range" => match error.params.get("max") {
            Some(max) => format!("Ensure this value is less than or equal to {}.", max),
            None => NEGATIVE_VALUE.to_string(),
        },
        other => format!("Invalid value ({}).", other),
    }
}

/// An enumerated field whose stored form is a short code
pub trait ChoiceCode: Sized + Copy + 'static {
    /// Every accepted value
    const ALL: &'static [Self];

    /// The stored code (e.g. `"NI"`)
    fn code(&self) -> &'static str;

    /// Looks a value up by its stored code
    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }
}

/// Reads typed values out of a [`FieldMap`], accumulating errors
///
/// Each accessor returns `None` when the field could not be read; the reason
/// is recorded in the reader's error map. Call [`FieldReader::finish`] once
/// every field has been read.
pub struct FieldReader<'a> {
    fields: &'a FieldMap,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a FieldMap) -> Self {
        Self {
            fields,
            errors: FieldErrors::new(),
        }
    }

    /// Returns the trimmed value of a field, or `None` if absent or blank
    fn raw(&self, name: &str) -> Option<&'a str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// A required text field; surrounding whitespace is removed
    pub fn required_text(&mut self, name: &str) -> Option<String> {
        match self.raw(name) {
            Some(value) => Some(value.to_string()),
            None => {
                self.errors.add(name, REQUIRED);
                None
            }
        }
    }

    /// An optional text field; blank counts as absent
    pub fn optional_text(&mut self, name: &str) -> Option<String> {
        self.raw(name).map(str::to_string)
    }

    /// A required ISO-8601 calendar date (`YYYY-MM-DD`)
    pub fn required_date(&mut self, name: &str) -> Option<NaiveDate> {
        let raw = self.required_raw(name)?;
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.errors.add(name, INVALID_DATE);
                None
            }
        }
    }

    /// A required non-negative whole number
    pub fn required_unsigned(&mut self, name: &str) -> Option<u32> {
        let raw = self.required_raw(name)?;
        match i64::from_str(raw) {
            Ok(value) if value < 0 => {
                self.errors.add(name, NEGATIVE_VALUE);
                None
            }
            Ok(value) => match u32::try_from(value) {
                Ok(value) => Some(value),
                Err(_) => {
                    self.errors.add(name, INVALID_INTEGER);
                    None
                }
            },
            Err(_) => {
                self.errors.add(name, INVALID_INTEGER);
                None
            }
        }
    }

    /// A required decimal number
    pub fn required_decimal(&mut self, name: &str) -> Option<Decimal> {
        let raw = self.required_raw(name)?;
        match Decimal::from_str(raw) {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.add(name, INVALID_NUMBER);
                None
            }
        }
    }

    /// A required premium amount: a decimal of at most 8 digits, 2 of them
    /// after the decimal point
    pub fn required_premium(&mut self, name: &str) -> Option<Decimal> {
        let value = self.required_decimal(name)?;
        match check_premium_precision(value) {
            Ok(()) => Some(value),
            Err(e) => {
                self.errors.add(name, e.to_string());
                None
            }
        }
    }

    /// A nullable boolean
    ///
    /// Absent fields take `default`; `unknown`, `null` or a blank value mean
    /// "not known" and yield `Some(None)`.
    pub fn nullable_bool(&mut self, name: &str, default: Option<bool>) -> Option<Option<bool>> {
        let Some(raw) = self.fields.get(name) else {
            return Some(default);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "unknown" | "null" | "none" => Some(None),
            "true" | "on" | "1" | "yes" => Some(Some(true)),
            "false" | "off" | "0" | "no" => Some(Some(false)),
            _ => {
                self.errors.add(name, "Enter a valid boolean.");
                None
            }
        }
    }

    /// A required enumerated choice
    pub fn required_choice<C: ChoiceCode>(&mut self, name: &str) -> Option<C> {
        let raw = self.required_raw(name)?;
        self.choice(name, raw)
    }

    /// An enumerated choice that falls back to `default` when absent or blank
    pub fn choice_or<C: ChoiceCode>(&mut self, name: &str, default: C) -> Option<C> {
        match self.raw(name) {
            Some(raw) => self.choice(name, raw),
            None => Some(default),
        }
    }

    fn choice<C: ChoiceCode>(&mut self, name: &str, raw: &str) -> Option<C> {
        match C::from_code(raw) {
            Some(value) => Some(value),
            None => {
                self.errors.add(
                    name,
                    format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        raw
                    ),
                );
                None
            }
        }
    }

    fn required_raw(&mut self, name: &str) -> Option<&'a str> {
        let raw = self.raw(name);
        if raw.is_none() {
            self.errors.add(name, REQUIRED);
        }
        raw
    }

    /// Returns the accumulated parse errors
    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_and_blank_fields_are_required() {
        let map = fields(&[("nome", "   ")]);
        let mut reader = FieldReader::new(&map);
        assert!(reader.required_text("nome").is_none());
        assert!(reader.required_text("cpf").is_none());

        let errors = reader.finish();
        assert_eq!(errors.get("nome"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.contains("cpf"));
    }

    #[test]
    fn test_negative_integer_rejected() {
        let map = fields(&[("ano_modelo", "-1")]);
        let mut reader = FieldReader::new(&map);
        assert!(reader.required_unsigned("ano_modelo").is_none());
        assert_eq!(
            reader.finish().get("ano_modelo"),
            Some(&[NEGATIVE_VALUE.to_string()][..])
        );
    }

    #[test]
    fn test_nullable_bool_defaults() {
        let map = fields(&[("a", "on"), ("b", "unknown")]);
        let mut reader = FieldReader::new(&map);
        assert_eq!(reader.nullable_bool("a", Some(false)), Some(Some(true)));
        assert_eq!(reader.nullable_bool("b", Some(false)), Some(None));
        assert_eq!(reader.nullable_bool("c", Some(false)), Some(Some(false)));
        assert!(reader.finish().is_empty());
    }

    #[derive(validator::Validate)]
    struct Sample {
        #[validate(length(max = 3))]
        plate: String,
        #[validate(range(max = 50))]
        percentage: u32,
    }

    #[test]
    fn test_validation_errors_use_form_names() {
        let sample = Sample {
            plate: "ABCD".to_string(),
            percentage: 51,
        };
        let invalid = validator::Validate::validate(&sample).unwrap_err();
        let errors = FieldErrors::from_validation(invalid, &[("plate", "placa")]);

        assert_eq!(
            errors.get("placa"),
            Some(&["Ensure this value has at most 3 characters.".to_string()][..])
        );
        assert!(!errors.contains("plate"));
        assert_eq!(
            errors.get("percentage"),
            Some(&["Ensure this value is less than or equal to 50.".to_string()][..])
        );
    }

    #[test]
    fn test_field_errors_merge_and_display() {
        let mut a = FieldErrors::new();
        a.add("codigo", "bad");
        let mut b = FieldErrors::new();
        b.add("codigo", "worse");
        b.add("placa", "too long");
        a.merge(b);

        assert_eq!(a.len(), 2);
        assert_eq!(a.get("codigo").map(|m| m.len()), Some(2));
        assert_eq!(a.to_string(), "codigo: bad worse; placa: too long");
    }
}
