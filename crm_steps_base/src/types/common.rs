//! # Scalar values and CRM records
//!
//! `FieldValue` is the scalar carried by records, step inputs and outcome
//! arguments. `Record` is an immutable, name-keyed bag of field values as
//! returned by a record finder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar value as it appears on a CRM record or in step input.
///
/// Deserialization is untagged so plain JSON scalars map directly:
/// `null`, `true`, `5000`, `12.5` and `"text"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null, or a string with no characters.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric reading of the value.
    ///
    /// Integers and floats are numeric. Strings are numeric when their trimmed
    /// text parses as a finite number. Booleans and null never are.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) if f.is_finite() => Some(*f),
            Self::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Exact integer reading: integers, and strings whose trimmed text parses
    /// as an `i64`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Textual form used for string comparison. Null reads as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Convert a JSON value into a scalar.
    ///
    /// Arrays and objects have no scalar reading and are kept as their compact
    /// JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s.clone()),
            other => Self::String(other.to_string()),
        }
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

/// Parse trimmed text as a finite number.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// A CRM record: field names mapped to scalar values.
///
/// Records are built once and then only read. A field that is present with a
/// null value is distinct from a field that is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used while assembling a record.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Build a record from a JSON object. Non-object input yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        value.as_object().map(Self::from_json_map)
    }

    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .iter()
                .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Whether the field is present at all, null values included.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Salesforce-style `Id` field as text.
    pub fn id(&self) -> Option<String> {
        self.get("Id").filter(|v| !v.is_blank()).map(FieldValue::to_text)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of the record restricted to the named fields that exist on it.
    pub fn project<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Record {
        let mut projected = Record::new();
        for name in names {
            if let Some(value) = self.fields.get(name) {
                projected.fields.insert(name.to_string(), value.clone());
            }
        }
        projected
    }

    pub fn into_fields(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
