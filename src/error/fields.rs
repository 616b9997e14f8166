use super::{Error, VALIDATION_FAILED};
use serde::Serialize;
use std::collections::BTreeMap;
use validator::ValidationErrors;

/// Validation messages keyed by the name of the offending field.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok` when nothing was collected, `VALIDATION_FAILED` otherwise.
    pub fn into_result(self) -> Result<(), Error<'static>> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(VALIDATION_FAILED.with_fields(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();

        for (field, errors) in errors.field_errors() {
            for error in errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => default_message(&error.code),
                };
                fields.add(&field.to_string(), message);
            }
        }

        fields
    }
}

fn default_message(code: &str) -> String {
    match code {
        "email" => "Enter a valid email address.".to_owned(),
        "length" => "Ensure this value has a valid length.".to_owned(),
        "required" => "This field is required.".to_owned(),
        other => format!("Invalid value ({other})."),
    }
}
