// File: promodash-common/src/models/form_field.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::traits::Draft;
use crate::validation::{parse_bool, require, FieldErrors};

/// Input kinds a player-facing entry form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Phone,
    Select,
    Checkbox,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "email" => Ok(FieldType::Email),
            "phone" => Ok(FieldType::Phone),
            "select" => Ok(FieldType::Select),
            "checkbox" => Ok(FieldType::Checkbox),
            other => Err(format!("Unknown field type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub id: i64,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub order: i32,
}

impl FormField {
    pub fn to_payload(&self) -> FormFieldPayload {
        FormFieldPayload {
            label: self.label.clone(),
            field_type: self.field_type,
            required: self.required,
            options: self.options.clone(),
            order: self.order,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct FormFieldPayload {
    #[validate(length(max = 100, message = "Label must be at most 100 characters"))]
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub options: Vec<String>,
    pub order: i32,
}

impl Draft for FormFieldPayload {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "label" => self.label = value.to_string(),
            "type" => self.field_type = value.parse()?,
            "required" => {
                self.required = parse_bool(value)
                    .ok_or_else(|| format!("required must be true or false, got '{value}'"))?
            }
            "options" => {
                self.options = value
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            }
            "order" => {
                self.order = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("order must be a whole number, got '{value}'"))?
            }
            other => return Err(format!("Unknown form field key '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "label", &self.label, "Label is required");
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        if self.field_type == FieldType::Select && self.options.is_empty() {
            errors.add("options", "Select fields need at least one option");
        }
        if self.order < 0 {
            errors.add("order", "Order cannot be negative");
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["label", "type", "required", "options", "order"]
    }
}
