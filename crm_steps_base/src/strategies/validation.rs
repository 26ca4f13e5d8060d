// src/strategies/validation.rs
//! Step definition validation
//!
//! Checks a definition for internal consistency at registration time, and
//! checks invocation inputs against a definition before a step runs.

use crate::strategies::definition::{FieldType, StepDefinition};
use crate::strategies::errors::DefinitionError;
use crate::types::error::StepInputError;
use crate::types::operators::Operator;
use crate::types::step_data::StepData;
use regex::Regex;
use std::collections::HashSet;

/// Step definition validator
pub struct StepDefinitionValidator;

impl StepDefinitionValidator {
    /// Validate a complete definition for internal consistency
    pub fn validate_definition(definition: &StepDefinition) -> Result<(), DefinitionError> {
        if definition.step_id.trim().is_empty() {
            return Err(DefinitionError::EmptyStepId);
        }

        Self::validate_unique_fields(definition)?;

        let expression = Regex::new(&definition.expression).map_err(|e| {
            DefinitionError::InvalidExpression {
                step_id: definition.step_id.clone(),
                reason: e.to_string(),
            }
        })?;

        Self::validate_capture_groups(definition, &expression)?;
        Self::validate_operator_tokens(definition)?;

        Ok(())
    }

    fn validate_unique_fields(definition: &StepDefinition) -> Result<(), DefinitionError> {
        let mut seen = HashSet::new();
        for field in &definition.expected_fields {
            if !seen.insert(field.key.as_str()) {
                return Err(DefinitionError::DuplicateField {
                    step_id: definition.step_id.clone(),
                    field: field.key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Every named group must be a declared field, and every required scalar
    /// field must be captured.
    fn validate_capture_groups(
        definition: &StepDefinition,
        expression: &Regex,
    ) -> Result<(), DefinitionError> {
        let groups: HashSet<&str> = expression.capture_names().flatten().collect();

        for group in &groups {
            if definition.field(group).is_none() {
                return Err(DefinitionError::UndeclaredCaptureGroup {
                    step_id: definition.step_id.clone(),
                    group: group.to_string(),
                });
            }
        }

        for field in definition.required_fields() {
            if field.field_type.is_scalar() && !groups.contains(field.key.as_str()) {
                return Err(DefinitionError::RequiredFieldNotCaptured {
                    step_id: definition.step_id.clone(),
                    field: field.key.clone(),
                });
            }
        }

        Ok(())
    }

    fn validate_operator_tokens(definition: &StepDefinition) -> Result<(), DefinitionError> {
        let Some(alternation) = operator_group(&definition.expression) else {
            return Ok(());
        };

        for token in alternation.split('|') {
            if token.parse::<Operator>().is_err() {
                return Err(DefinitionError::UnknownOperatorToken {
                    step_id: definition.step_id.clone(),
                    token: token.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate invocation inputs against the definition's required fields.
    pub fn validate_inputs(definition: &StepDefinition, data: &StepData) -> Result<(), StepInputError> {
        for field in definition.required_fields() {
            match field.field_type {
                FieldType::Map => {
                    data.map(&field.key)?;
                }
                _ => {
                    if !data.has(&field.key) {
                        return Err(StepInputError::missing(&field.key));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Body of the `operator` named group, if the expression has one.
fn operator_group(expression: &str) -> Option<&str> {
    let start = ["(?<operator>", "(?P<operator>"]
        .iter()
        .find_map(|open| expression.find(open).map(|i| i + open.len()))?;

    let mut depth = 0usize;
    let mut escaped = false;
    for (offset, ch) in expression[start..].char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' if depth == 0 => return Some(&expression[start..start + offset]),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::definition::{operator_clause, operator_fields, FieldDefinition, StepType};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn field_check_definition(expression: String) -> StepDefinition {
        let [operator, expected] = operator_fields();
        StepDefinition::new("LeadFieldEquals", "Check a field on a Salesforce Lead", expression, StepType::Validation)
            .with_field(FieldDefinition::required("email", FieldType::Email, "Lead email"))
            .with_field(FieldDefinition::required("field", FieldType::String, "Field name"))
            .with_field(operator)
            .with_field(expected)
    }

    #[test]
    fn test_valid_definition() {
        let definition = field_check_definition(format!(
            "the (?<field>[a-zA-Z0-9_]+) field on salesforce lead (?<email>.+) {}",
            operator_clause()
        ));
        assert!(StepDefinitionValidator::validate_definition(&definition).is_ok());
    }

    #[test]
    fn test_invalid_expression() {
        let definition = field_check_definition("the (?<field>[a-z".to_string());
        assert_matches!(
            StepDefinitionValidator::validate_definition(&definition),
            Err(DefinitionError::InvalidExpression { .. })
        );
    }

    #[test]
    fn test_undeclared_group_and_uncaptured_field() {
        let definition = field_check_definition(format!(
            "the (?<field>\\w+) field on (?<object>\\w+) lead (?<email>.+) {}",
            operator_clause()
        ));
        assert_matches!(
            StepDefinitionValidator::validate_definition(&definition),
            Err(DefinitionError::UndeclaredCaptureGroup { group, .. }) if group == "object"
        );

        let definition = field_check_definition(format!("the (?<field>\\w+) field {}", operator_clause()));
        assert_matches!(
            StepDefinitionValidator::validate_definition(&definition),
            Err(DefinitionError::RequiredFieldNotCaptured { field, .. }) if field == "email"
        );
    }

    #[test]
    fn test_unknown_operator_token() {
        let definition = field_check_definition(
            "the (?<field>\\w+) field on salesforce lead (?<email>.+) should (?<operator>be|equal) (?<expectedValue>.+)"
                .to_string(),
        );
        assert_matches!(
            StepDefinitionValidator::validate_definition(&definition),
            Err(DefinitionError::UnknownOperatorToken { token, .. }) if token == "equal"
        );
    }

    #[test]
    fn test_operator_group_extraction() {
        assert_eq!(operator_group("x (?<operator>be|not be) y"), Some("be|not be"));
        assert_eq!(operator_group("x (?P<operator>a(b)c) y"), Some("a(b)c"));
        assert_eq!(operator_group("no group here"), None);
    }

    #[test]
    fn test_input_validation() {
        let definition = StepDefinition::new("CreateLead", "Create a Salesforce Lead", "create a salesforce lead", StepType::Action)
            .with_field(FieldDefinition::required("lead", FieldType::Map, "Lead fields"));

        let ok = StepData::from_value(json!({"lead": {"Email": "a@b.c"}})).unwrap();
        assert!(StepDefinitionValidator::validate_inputs(&definition, &ok).is_ok());

        let missing = StepData::default();
        assert_matches!(
            StepDefinitionValidator::validate_inputs(&definition, &missing),
            Err(StepInputError::MissingField { field }) if field == "lead"
        );

        let wrong = StepData::from_value(json!({"lead": "nope"})).unwrap();
        assert_matches!(
            StepDefinitionValidator::validate_inputs(&definition, &wrong),
            Err(StepInputError::TypeMismatch { .. })
        );
    }
}
