/// Step input errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepInputError {
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Type mismatch for field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Step data must be a JSON object, found {found}")]
    NotAnObject { found: String },
}

impl StepInputError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub fn mismatch(field: &str, expected: &'static str, found: &serde_json::Value) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
            found: json_type_name(found).to_string(),
        }
    }

    /// Name of the offending field, if the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } | Self::TypeMismatch { field, .. } => Some(field),
            Self::NotAnObject { .. } => None,
        }
    }
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
