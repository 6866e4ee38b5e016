use crate::error::{McpError, McpResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse JSON value into a typed parameter struct. A missing argument
/// object is treated as `{}` so tools with only optional params accept it.
pub fn parse_params<T: DeserializeOwned>(params: Value) -> McpResult<T> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params)
        .map_err(|e| McpError::InvalidParameter(format!("Invalid parameters: {}", e)))
}

/// Validate that at least one of the required fields is present
pub fn validate_required_one_of<T, U>(
    value: &Option<T>,
    other: &Option<U>,
    field_names: &str,
) -> McpResult<()> {
    if value.is_none() && other.is_none() {
        return Err(McpError::InvalidParameter(format!(
            "Either {} must be provided",
            field_names
        )));
    }
    Ok(())
}

/// Treat empty or whitespace-only strings as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treat empty lists as absent
pub fn non_empty<T>(value: Option<Vec<T>>) -> Option<Vec<T>> {
    value.filter(|v| !v.is_empty())
}

/// A parameter accepted either as one string or as a list of strings.
/// A single string may itself be comma-separated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        let values = match self {
            OneOrMany::One(value) => value.split(',').map(str::to_string).collect(),
            OneOrMany::Many(values) => values,
        };
        values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }
}
