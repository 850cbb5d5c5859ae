//! Field-level validation for the intake forms.
//!
//! Validators never touch form state. They return a [`FieldErrors`] map keyed by field path
//! (`email`, `new_lessee.phone`, ...); an empty map means the form may be submitted.

mod phone;
pub mod rules;

use std::collections::BTreeMap;

use serde::Serialize;

pub use phone::format_phone_number;

/// Implemented by every form that can block its own submission.
pub trait Validate {
    fn validate(&self) -> FieldErrors;
}

/// Mapping from field path to the message shown next to that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Record the outcome of a single rule under `field`.
    pub fn check<T>(&mut self, field: &str, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(field, message);
                None
            }
        }
    }

    /// Fold a sub-form's errors in under `prefix.`.
    pub fn nest(&mut self, prefix: &str, nested: FieldErrors) {
        for (field, message) in nested.0 {
            self.0.insert(format!("{prefix}.{field}"), message);
        }
    }

    /// `Ok(value)` when no field failed, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}
