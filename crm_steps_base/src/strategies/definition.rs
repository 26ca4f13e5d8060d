// src/strategies/definition.rs
//! Step definitions
//!
//! A `StepDefinition` is the static contract of a step: its id, the natural
//! language expression that matches it, the inputs it expects and the records
//! it may emit.

use crate::types::operators::Operator;
use serde::{Deserialize, Serialize};

/// Whether a step performs an action or asserts something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Action,
    Validation,
}

/// Declared type of a step input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Numeric,
    Boolean,
    Email,
    AnyScalar,
    Map,
}

impl FieldType {
    /// Scalar inputs can be captured from a step expression.
    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optionality {
    Required,
    Optional,
}

/// One expected input of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,
    pub field_type: FieldType,
    pub optionality: Optionality,
    pub description: String,
}

impl FieldDefinition {
    pub fn required(key: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            optionality: Optionality::Required,
            description: description.to_string(),
        }
    }

    pub fn optional(key: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            optionality: Optionality::Optional,
            ..Self::required(key, field_type, description)
        }
    }

    pub fn is_required(&self) -> bool {
        self.optionality == Optionality::Required
    }
}

/// Record a step may emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDefinition {
    pub id: String,
    pub record_type: crate::results::RecordType,
    pub fields: Vec<FieldDefinition>,
    pub dynamic_fields: bool,
}

impl RecordDefinition {
    pub fn key_value(id: &str, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.to_string(),
            record_type: crate::results::RecordType::KeyValue,
            fields,
            dynamic_fields: false,
        }
    }
}

/// Static contract of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub step_id: String,
    pub name: String,
    pub expression: String,
    pub step_type: StepType,
    pub expected_fields: Vec<FieldDefinition>,
    pub expected_records: Vec<RecordDefinition>,
}

impl StepDefinition {
    pub fn new(step_id: &str, name: &str, expression: impl Into<String>, step_type: StepType) -> Self {
        Self {
            step_id: step_id.to_string(),
            name: name.to_string(),
            expression: expression.into(),
            step_type,
            expected_fields: Vec::new(),
            expected_records: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.expected_fields.push(field);
        self
    }

    pub fn with_record(mut self, record: RecordDefinition) -> Self {
        self.expected_records.push(record);
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.expected_fields.iter().find(|f| f.key == key)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.expected_fields.iter().filter(|f| f.is_required())
    }
}

/// Expression tail shared by field validation steps:
/// `should <operator> <expectedValue>` where the expected value is optional
/// so that `be set` / `not be set` read naturally.
pub fn operator_clause() -> String {
    format!(
        "should (?<operator>{}) ?(?<expectedValue>.+)?",
        Operator::expression_alternation()
    )
}

/// The `operator` and `expectedValue` inputs every field validation step takes.
pub fn operator_fields() -> [FieldDefinition; 2] {
    [
        FieldDefinition::optional(
            "operator",
            FieldType::String,
            "Check Logic (be, not be, contain, not contain, be greater than, be less than, \
             be one of, not be one of, be set, or not be set)",
        ),
        FieldDefinition::optional(
            "expectedValue",
            FieldType::AnyScalar,
            "The expected value of the field",
        ),
    ]
}
