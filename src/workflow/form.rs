// Copyright 2023 Remi Bernotavicius

use std::collections::BTreeMap;
use std::str::FromStr;

pub const REQUIRED: &str = "This field is required";
pub const NOT_A_NUMBER: &str = "Must be a number";

/// Per-field validation messages, keyed by the field's path in the form (`name`, `prices.2`,
/// `ingredients.0.quantity`, ...). A form may only be submitted when this is empty.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|m| m.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Records an error if `value` is blank. Returns the trimmed value.
    pub fn required_text<'a>(&mut self, field: impl Into<String>, value: &'a str) -> &'a str {
        let value = value.trim();
        if value.is_empty() {
            self.insert(field, REQUIRED);
        }
        value
    }

    /// A blank value is fine and gives `None`, anything else must parse to a finite number and be
    /// at least `min`.
    pub fn optional_at_least<T>(&mut self, field: impl Into<String>, value: &str, min: T) -> Option<T>
    where
        T: FromStr + PartialOrd + ToString + Copy + Into<f64>,
    {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let field = field.into();
        match value.parse::<T>() {
            Ok(n) if !Into::<f64>::into(n).is_finite() => {
                self.insert(field, NOT_A_NUMBER);
                None
            }
            Ok(n) if n >= min => Some(n),
            Ok(_) => {
                self.insert(field, format!("Must be at least {}", min.to_string()));
                None
            }
            Err(_) => {
                self.insert(field, NOT_A_NUMBER);
                None
            }
        }
    }

    /// Like [`Self::optional_at_least`] but a blank value is an error too.
    pub fn required_at_least<T>(&mut self, field: impl Into<String>, value: &str, min: T) -> Option<T>
    where
        T: FromStr + PartialOrd + ToString + Copy + Into<f64>,
    {
        let field = field.into();
        if value.trim().is_empty() {
            self.insert(field, REQUIRED);
            return None;
        }
        self.optional_at_least(field, value, min)
    }

    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

#[test]
fn required_text() {
    let mut errors = FieldErrors::new();
    assert_eq!(errors.required_text("name", "  Flour "), "Flour");
    assert!(errors.is_empty());

    errors.required_text("name", "   ");
    assert_eq!(errors.get("name"), Some(REQUIRED));
}

#[test]
fn optional_numbers() {
    let mut errors = FieldErrors::new();
    assert_eq!(errors.optional_at_least("calories", "", 0.0f32), None);
    assert_eq!(errors.optional_at_least("calories", " 12.5", 0.0f32), Some(12.5));
    assert_eq!(errors.optional_at_least("calories", "0", 0.0f32), Some(0.0));
    assert!(errors.is_empty());

    assert_eq!(errors.optional_at_least("protein", "-1", 0.0f32), None);
    assert_eq!(errors.optional_at_least("fat", "lots", 0.0f32), None);
    assert_eq!(errors.get("protein"), Some("Must be at least 0"));
    assert_eq!(errors.get("fat"), Some(NOT_A_NUMBER));
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["fat", "protein"]);
}

#[test]
fn required_numbers() {
    let mut errors = FieldErrors::new();
    assert_eq!(errors.required_at_least("servings", "4", 1), Some(4));
    assert!(errors.is_empty());

    assert_eq!(errors.required_at_least("servings", "", 1), None);
    assert_eq!(errors.get("servings"), Some(REQUIRED));

    let mut errors = FieldErrors::new();
    assert_eq!(errors.required_at_least("servings", "0", 1), None);
    assert_eq!(errors.get("servings"), Some("Must be at least 1"));

    let mut errors = FieldErrors::new();
    assert_eq!(errors.required_at_least("servings", "2.5", 1), None);
    assert_eq!(errors.get("servings"), Some(NOT_A_NUMBER));
    assert_eq!(errors.clone().into_result(()), Err(errors));
}

#[test]
fn infinite_numbers_rejected() {
    let mut errors = FieldErrors::new();
    assert_eq!(errors.optional_at_least("calories", "inf", 0.0f32), None);
    assert_eq!(errors.optional_at_least("fat", "1e40", 0.0f32), None);
    assert_eq!(errors.required_at_least("price", "infinity", 0.0f32), None);
    assert_eq!(errors.get("calories"), Some(NOT_A_NUMBER));
    assert_eq!(errors.get("fat"), Some(NOT_A_NUMBER));
    assert_eq!(errors.get("price"), Some(NOT_A_NUMBER));
}
