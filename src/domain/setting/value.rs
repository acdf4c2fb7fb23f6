//! Typed setting values

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::SettingKind;

/// A setting payload.
///
/// Serialized as `{"type": ..., "value": ...}` so storage and cache round-trips
/// keep the native type (an integer is never read back as a float).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SettingValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Mapping(Map<String, Value>),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Boolean(_) => SettingKind::Boolean,
            SettingValue::Integer(_) => SettingKind::Integer,
            SettingValue::Float(_) => SettingKind::Float,
            SettingValue::String(_) => SettingKind::String,
            SettingValue::List(_) => SettingKind::List,
            SettingValue::Mapping(_) => SettingKind::Mapping,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            SettingValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            SettingValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Untagged JSON form of the payload
    pub fn to_json(&self) -> Value {
        match self {
            SettingValue::Boolean(b) => Value::Bool(*b),
            SettingValue::Integer(i) => Value::from(*i),
            SettingValue::Float(f) => Value::from(*f),
            SettingValue::String(s) => Value::String(s.clone()),
            SettingValue::List(items) => Value::Array(items.clone()),
            SettingValue::Mapping(map) => Value::Object(map.clone()),
        }
    }

    /// Text form for editing surfaces; coercing it with `kind()` yields an equal value.
    pub fn render(&self) -> String {
        match self {
            SettingValue::Boolean(b) => b.to_string(),
            SettingValue::Integer(i) => i.to_string(),
            SettingValue::Float(f) => format!("{:?}", f),
            SettingValue::String(s) => s.clone(),
            SettingValue::List(_) | SettingValue::Mapping(_) => self.to_json().to_string(),
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<Vec<Value>> for SettingValue {
    fn from(value: Vec<Value>) -> Self {
        SettingValue::List(value)
    }
}

impl From<Map<String, Value>> for SettingValue {
    fn from(value: Map<String, Value>) -> Self {
        SettingValue::Mapping(value)
    }
}
