//! Tool parameter schemas and validation
//!
//! A [`ToolSchema`] is a deliberately small subset of JSON Schema: a flat map
//! of named properties with a primitive type and optional enum / range /
//! length constraints. [`validate_params`] collects every violation instead of
//! stopping at the first one, so a single response can report all problems.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Primitive type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// JSON string
    String,
    /// Any JSON number
    Number,
    /// JSON number without a fractional part
    Integer,
    /// JSON boolean
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
}

impl PropertyType {
    /// Wire name of the type
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Whether `value` has this type
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
            }
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// Constraints for a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    /// Expected primitive type
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Human description shown in tool listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    /// Inclusive numeric lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive numeric upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum string length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl PropertySchema {
    /// Unconstrained property of the given type
    pub fn of(kind: PropertyType) -> Self {
        Self {
            kind,
            description: None,
            allowed: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
        }
    }
}

/// Input schema of one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Method name
    pub name: String,
    /// Properties that must be present
    #[serde(default)]
    pub required: Vec<String>,
    /// Accepted properties
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

impl ToolSchema {
    /// Render as a JSON Schema object for tool listings
    pub fn to_json_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
            "additionalProperties": false,
        })
    }
}

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Offending property name
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of [`validate_params`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True when `errors` is empty
    pub valid: bool,
    /// Every violation found
    pub errors: Vec<FieldViolation>,
}

impl ValidationReport {
    /// Whether a violation names `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Validate `params` against `schema`, collecting all violations
pub fn validate_params(
    params: Option<&Map<String, Value>>,
    schema: &ToolSchema,
) -> ValidationReport {
    let empty = Map::new();
    let params = params.unwrap_or(&empty);
    let mut errors = Vec::new();

    for field in &schema.required {
        if !params.contains_key(field) {
            errors.push(FieldViolation::new(field, "is required"));
        }
    }

    for (field, value) in params {
        match schema.properties.get(field) {
            Some(property) => check_property(field, value, property, &mut errors),
            None => errors.push(FieldViolation::new(field, "is not an accepted parameter")),
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_property(
    field: &str,
    value: &Value,
    property: &PropertySchema,
    errors: &mut Vec<FieldViolation>,
) {
    if !property.kind.matches(value) {
        errors.push(FieldViolation::new(
            field,
            format!("must be of type {}", property.kind.as_str()),
        ));
        // Constraint checks assume the right type.
        return;
    }

    if let Some(allowed) = &property.allowed {
        if !allowed.contains(value) {
            let options: Vec<String> = allowed.iter().map(Value::to_string).collect();
            errors.push(FieldViolation::new(
                field,
                format!("must be one of {}", options.join(", ")),
            ));
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(min) = property.minimum {
            if number < min {
                errors.push(FieldViolation::new(field, format!("must be >= {min}")));
            }
        }
        if let Some(max) = property.maximum {
            if number > max {
                errors.push(FieldViolation::new(field, format!("must be <= {max}")));
            }
        }
    }

    if let Some(text) = value.as_str() {
        let length = text.chars().count();
        if let Some(min) = property.min_length {
            if length < min {
                errors.push(FieldViolation::new(
                    field,
                    format!("must be at least {min} characters"),
                ));
            }
        }
        if let Some(max) = property.max_length {
            if length > max {
                errors.push(FieldViolation::new(
                    field,
                    format!("must be at most {max} characters"),
                ));
            }
        }
    }
}
