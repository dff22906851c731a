//! Form validation.
//!
//! Rules are attached to view-models through the [`Validate`] trait and report
//! into a [`ModelState`], a field-keyed collection of error messages.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field validation errors collected while binding a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelState {
    errors: BTreeMap<String, Vec<String>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Appends every message from `other`.
    pub fn merge(&mut self, other: ModelState) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}

pub trait Validate {
    fn validate(&self) -> ModelState;
}

/// Records `message` when `value` is missing or blank.
pub fn required(state: &mut ModelState, field: &str, value: Option<&str>, message: &str) -> bool {
    match value {
        Some(v) if !v.trim().is_empty() => true,
        _ => {
            state.add_model_error(field, message);
            false
        }
    }
}

/// Records `message` when `value` falls outside `min..=max` characters.
///
/// Absent values pass; pair with [`required`] when the field is mandatory.
pub fn string_length(
    state: &mut ModelState,
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
    message: &str,
) {
    if let Some(v) = value {
        let len = v.chars().count();
        if len < min || len > max {
            state.add_model_error(field, message);
        }
    }
}
