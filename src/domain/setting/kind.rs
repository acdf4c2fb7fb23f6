//! Setting kinds and raw-text coercion

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

use super::value::SettingValue;

const TRUE_TOKENS: [&str; 6] = ["y", "yes", "t", "true", "on", "1"];
const FALSE_TOKENS: [&str; 6] = ["n", "no", "f", "false", "off", "0"];

/// Declared data type of a setting, fixed when the setting is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "int")]
    Integer,
    Float,
    #[serde(alias = "str")]
    String,
    List,
    #[serde(alias = "dict", alias = "map")]
    Mapping,
}

impl SettingKind {
    pub const ALL: [SettingKind; 6] = [
        SettingKind::Boolean,
        SettingKind::Integer,
        SettingKind::Float,
        SettingKind::String,
        SettingKind::List,
        SettingKind::Mapping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::Boolean => "boolean",
            SettingKind::Integer => "integer",
            SettingKind::Float => "float",
            SettingKind::String => "string",
            SettingKind::List => "list",
            SettingKind::Mapping => "mapping",
        }
    }

    /// Coerces operator-supplied text into a value of this kind.
    ///
    /// Booleans accept `y/yes/t/true/on/1` and `n/no/f/false/off/0` in any case.
    /// Lists and mappings are parsed as JSON and must have the matching top-level
    /// shape. Strings are taken verbatim.
    pub fn coerce(&self, raw: &str) -> Result<SettingValue, DomainError> {
        match self {
            SettingKind::Boolean => parse_bool(raw)
                .map(SettingValue::Boolean)
                .ok_or_else(|| {
                    DomainError::invalid_value(
                        *self,
                        raw,
                        format!(
                            "expected one of {} or {}",
                            TRUE_TOKENS.join("/"),
                            FALSE_TOKENS.join("/")
                        ),
                    )
                }),
            SettingKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(SettingValue::Integer)
                .map_err(|e| DomainError::invalid_value(*self, raw, e.to_string())),
            SettingKind::Float => {
                let parsed = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| DomainError::invalid_value(*self, raw, e.to_string()))?;

                if !parsed.is_finite() {
                    return Err(DomainError::invalid_value(
                        *self,
                        raw,
                        "value must be a finite number",
                    ));
                }
                Ok(SettingValue::Float(parsed))
            }
            SettingKind::String => Ok(SettingValue::String(raw.to_string())),
            SettingKind::List => match parse_json(*self, raw)? {
                Value::Array(items) => Ok(SettingValue::List(items)),
                other => Err(DomainError::invalid_value(
                    *self,
                    raw,
                    format!("expected a JSON array, got {}", json_type_name(&other)),
                )),
            },
            SettingKind::Mapping => match parse_json(*self, raw)? {
                Value::Object(map) => Ok(SettingValue::Mapping(map)),
                other => Err(DomainError::invalid_value(
                    *self,
                    raw,
                    format!("expected a JSON object, got {}", json_type_name(&other)),
                )),
            },
        }
    }
}

impl std::fmt::Display for SettingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SettingKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boolean" | "bool" => Ok(SettingKind::Boolean),
            "integer" | "int" => Ok(SettingKind::Integer),
            "float" => Ok(SettingKind::Float),
            "string" | "str" => Ok(SettingKind::String),
            "list" => Ok(SettingKind::List),
            "mapping" | "dict" | "map" => Ok(SettingKind::Mapping),
            _ => Err(DomainError::validation(format!(
                "Unknown setting kind: {}. Valid kinds: boolean, integer, float, string, list, mapping",
                s
            ))),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let token = raw.trim().to_ascii_lowercase();

    if TRUE_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn parse_json(kind: SettingKind, raw: &str) -> Result<Value, DomainError> {
    serde_json::from_str(raw).map_err(|e| DomainError::invalid_value(kind, raw, e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
