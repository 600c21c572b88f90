//! Request validation.
//!
//! A [`Validator`] exposes the errors it accumulated; controllers turn them
//! into a `400` with `ActionController::validation_errors`.

use crate::http::Params;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use strum_macros::{AsRefStr, Display};

/// Field name to the messages recorded against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

pub trait Validator: Send + Sync + 'static {
    /// Errors accumulated so far.
    fn errors(&self) -> ValidationErrors;
}

#[derive(Debug, Clone, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rule {
    Required,
    Email,
    Numeric,
    Alpha,
    MinLength(usize),
    MaxLength(usize),
}

impl Rule {
    /// `None` when `value` passes, otherwise the message to record.
    fn check(&self, field: &str, value: &Value) -> Option<String> {
        if value.is_null() {
            return matches!(self, Rule::Required).then(|| format!("{field} is required"));
        }
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let passed = match self {
            Rule::Required => !text.trim().is_empty(),
            Rule::Email => is_email(&text),
            Rule::Numeric => value.is_number() || text.trim().parse::<f64>().is_ok(),
            Rule::Alpha => !text.is_empty() && text.chars().all(char::is_alphabetic),
            Rule::MinLength(min) => text.chars().count() >= *min,
            Rule::MaxLength(max) => text.chars().count() <= *max,
        };
        if passed {
            return None;
        }
        Some(match self {
            Rule::Required => format!("{field} is required"),
            Rule::Email => format!("{field} must be a valid email address"),
            Rule::Numeric => format!("{field} must be numeric"),
            Rule::Alpha => format!("{field} must contain only letters"),
            Rule::MinLength(min) => format!("{field} must be at least {min} characters"),
            Rule::MaxLength(max) => format!("{field} must be at most {max} characters"),
        })
    }
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty() && !label.contains('@'))
        && !text.chars().any(char::is_whitespace)
}

/// Rule-based validator that keeps the errors of its last run.
///
/// Register it with `register_factory` so that each controller instance
/// owns a fresh one.
#[derive(Debug, Default)]
pub struct RuleValidator {
    errors: Mutex<ValidationErrors>,
}

impl RuleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `params` against `rules`, replacing any previous errors.
    /// Returns true when every rule passed.
    pub fn validate<'a, I>(&self, params: &Params, rules: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a [Rule])>,
    {
        static ABSENT: Value = Value::Null;

        let mut errors = ValidationErrors::new();
        for (field, field_rules) in rules {
            let value = params.get(field).unwrap_or(&ABSENT);
            for rule in field_rules {
                if let Some(message) = rule.check(field, value) {
                    errors.add(field, message);
                }
            }
        }

        let passed = errors.is_empty();
        if !passed {
            tracing::debug!(fields = errors.len(), "validation failed");
        }
        *self.errors.lock().unwrap_or_else(PoisonError::into_inner) = errors;
        passed
    }
}

impl Validator for RuleValidator {
    fn errors(&self) -> ValidationErrors {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
