//! JSON text boundary for callers that hold templates as text.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::template::Template;

/// Parses JSON text into a template. The top level must be an object or array.
pub fn parse(text: &str) -> Result<Template> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        other => Err(Error::InvalidTemplate(format!(
            "top-level template must be an object or array, found {}",
            kind_label(&other)
        ))),
    }
}

/// Serializes a template or generated value as compact JSON.
pub fn stringify(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serializes a template or generated value as indented JSON.
pub fn stringify_pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn kind_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
