//! Field-level validation errors
//!
//! Form validation collects every problem before reporting, so a single
//! submission can surface several messages on several fields.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field name used for errors that do not belong to one input
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Ordered map of field name to its error messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a message to `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Builder form of [`FieldErrors::add`]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(value)` when no error was collected
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_every_message() {
        let mut errors = FieldErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        errors.add("user_name", "taken");

        assert_eq!(errors.get("email"), ["first", "second"]);
        assert_eq!(errors.get("user_name"), ["taken"]);
        assert!(errors.get("missing").is_empty());
    }

    #[test]
    fn test_merge_and_result() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.clone().into_result(1), Ok(1));

        errors.merge(FieldErrors::new().with("date", "required"));
        assert!(errors.contains("date"));
        assert!(errors.into_result(1).is_err());
    }

    #[test]
    fn test_display_and_json() {
        let errors = FieldErrors::new().with("a", "x").with("b", "y");
        assert_eq!(errors.to_string(), "a: x; b: y");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"a": ["x"], "b": ["y"]}));
    }
}
