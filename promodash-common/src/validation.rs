// File: promodash-common/src/validation.rs
//
// Field-level error collection shared by local draft validation and
// server-side (HTTP 400) rejections.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidationErrors;

/// Key used for messages that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let messages = self.0.entry(field.into()).or_default();
        let message = message.into();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            for m in messages {
                self.add(field.clone(), m);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.first()).map(|s| s.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was collected, otherwise hands the errors back.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Converts the output of a `#[derive(Validate)]` check. Messages set with
    /// `message = "..."` win over the rule code.
    pub fn from_validator(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, e.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }

    /// Maps a rejected submission body (`{"field": ["msg", ...], "detail": "..."}`)
    /// back onto field keys. Nested objects flatten to `parent.child`.
    pub fn from_server_body(body: &str) -> Self {
        let mut out = FieldErrors::new();
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    let field = if key == "detail" { NON_FIELD_ERRORS.to_string() } else { key };
                    collect_messages(&mut out, &field, &value);
                }
            }
            Ok(Value::Array(items)) => {
                for item in &items {
                    collect_messages(&mut out, NON_FIELD_ERRORS, item);
                }
            }
            Ok(Value::String(s)) => out.add(NON_FIELD_ERRORS, s),
            _ => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    out.add(NON_FIELD_ERRORS, "The request was rejected by the server");
                } else {
                    out.add(NON_FIELD_ERRORS, trimmed);
                }
            }
        }
        if out.is_empty() {
            out.add(NON_FIELD_ERRORS, "The request was rejected by the server");
        }
        out
    }
}

fn collect_messages(out: &mut FieldErrors, field: &str, value: &Value) {
    match value {
        Value::String(s) => out.add(field, s.clone()),
        Value::Array(items) => {
            for item in items {
                collect_messages(out, field, item);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                collect_messages(out, &format!("{field}.{k}"), v);
            }
        }
        Value::Null => {}
        other => out.add(field, other.to_string()),
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for m in messages {
                if !first {
                    write!(f, "; ")?;
                }
                first = false;
                if field == NON_FIELD_ERRORS {
                    write!(f, "{m}")?;
                } else {
                    write!(f, "{field}: {m}")?;
                }
            }
        }
        Ok(())
    }
}

/// Adds `message` under `field` when `value` is blank.
pub fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

/// `#RGB` or `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_id(field: &str, value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("{field} must be a numeric id, got '{value}'"))
}

/// Blank or `none` clears an optional text input.
pub fn optional_text(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_body_maps_fields_and_detail() {
        let body = r#"{"name": ["This field may not be blank."], "detail": "Nope", "branding": {"primary_color": ["Bad colour"]}}"#;
        let errors = FieldErrors::from_server_body(body);
        assert_eq!(errors.first("name"), Some("This field may not be blank."));
        assert_eq!(errors.first(NON_FIELD_ERRORS), Some("Nope"));
        assert_eq!(errors.first("branding.primary_color"), Some("Bad colour"));
    }

    #[test]
    fn server_body_that_is_not_json_becomes_general_message() {
        let errors = FieldErrors::from_server_body("Bad Request");
        assert_eq!(errors.first(NON_FIELD_ERRORS), Some("Bad Request"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn duplicate_messages_are_collapsed() {
        let mut errors = FieldErrors::new();
        errors.add("name", "Name is required");
        errors.add("name", "Name is required");
        assert_eq!(errors.get("name").map(|m| m.len()), Some(1));
        assert_eq!(errors.to_string(), "name: Name is required");
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("1A2B3C"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#GGGGGG"));
    }
}
