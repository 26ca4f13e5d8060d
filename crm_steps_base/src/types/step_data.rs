//! Typed access to a step's input map.

use super::common::{FieldValue, Record};
use super::error::{json_type_name, StepInputError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inputs supplied to one step invocation, keyed by field name.
///
/// A key holding JSON `null` reads the same as an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepData {
    values: Map<String, Value>,
}

impl StepData {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn from_value(value: Value) -> Result<Self, StepInputError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(StepInputError::NotAnObject {
                found: json_type_name(&other).to_string(),
            }),
        }
    }

    /// Builder-style insert, mostly for tests and programmatic callers.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.present(key).is_some()
    }

    pub fn required_str(&self, key: &str) -> Result<&str, StepInputError> {
        self.optional_str(key)?
            .ok_or_else(|| StepInputError::missing(key))
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&str>, StepInputError> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(StepInputError::mismatch(key, "string", other)),
        }
    }

    /// Scalar input. Arrays and objects are rejected.
    pub fn scalar(&self, key: &str) -> Result<Option<FieldValue>, StepInputError> {
        match self.present(key) {
            None => Ok(None),
            Some(v @ (Value::Array(_) | Value::Object(_))) => {
                Err(StepInputError::mismatch(key, "scalar", v))
            }
            Some(v) => Ok(Some(FieldValue::from_json(v))),
        }
    }

    pub fn required_scalar(&self, key: &str) -> Result<FieldValue, StepInputError> {
        self.scalar(key)?.ok_or_else(|| StepInputError::missing(key))
    }

    pub fn map(&self, key: &str) -> Result<&Map<String, Value>, StepInputError> {
        match self.present(key) {
            None => Err(StepInputError::missing(key)),
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(StepInputError::mismatch(key, "map", other)),
        }
    }

    /// Map input converted into a record of scalar fields.
    pub fn record(&self, key: &str) -> Result<Record, StepInputError> {
        self.map(key).map(Record::from_json_map)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for StepData {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn data() -> StepData {
        StepData::from_value(json!({
            "field": "Amount",
            "identifier": 42,
            "operator": null,
            "lead": {"Email": "a@b.c", "LastName": "Lovelace"},
            "tags": ["a", "b"]
        }))
        .unwrap()
    }

    #[test]
    fn test_string_accessors() {
        let data = data();
        assert_eq!(data.required_str("field").unwrap(), "Amount");
        assert_eq!(data.optional_str("operator").unwrap(), None);
        assert_matches!(
            data.required_str("missing"),
            Err(StepInputError::MissingField { field }) if field == "missing"
        );
        assert_matches!(
            data.required_str("identifier"),
            Err(StepInputError::TypeMismatch { expected: "string", .. })
        );
    }

    #[test]
    fn test_scalar_accessors() {
        let data = data();
        assert_eq!(data.required_scalar("identifier").unwrap(), FieldValue::Integer(42));
        assert_eq!(data.scalar("operator").unwrap(), None);
        assert_matches!(data.scalar("tags"), Err(StepInputError::TypeMismatch { .. }));
    }

    #[test]
    fn test_map_and_record() {
        let data = data();
        let lead = data.record("lead").unwrap();
        assert_eq!(lead.get("LastName"), Some(&FieldValue::from("Lovelace")));
        assert_matches!(data.map("field"), Err(StepInputError::TypeMismatch { expected: "map", .. }));
        assert!(!data.has("operator"));
    }

    #[test]
    fn test_non_object_input_rejected() {
        assert_matches!(
            StepData::from_value(json!([1])),
            Err(StepInputError::NotAnObject { found }) if found == "array"
        );
    }
}
