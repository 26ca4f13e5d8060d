//! # Comparison evaluation
//!
//! Decides whether a comparison holds. Never decides pass or fail; that is
//! the outcome builder's job.

use super::coercion::{coerce, CoercedPair, Operand};
use crate::types::common::FieldValue;
use crate::types::operators::Operator;

/// Error types for comparison operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    #[error("Unknown operator '{token}'.")]
    UnknownOperator { token: String },

    #[error("Cannot compare '{value}' using operator '{operator}': {reason}.")]
    InvalidOperand {
        value: String,
        operator: Operator,
        reason: String,
    },

    #[error("The operator '{operator}' requires an expected value. Please provide one.")]
    MissingExpectedValue { operator: String },
}

/// One field comparison: the field's actual value against an expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'a> {
    pub field: &'a str,
    /// Operator token as supplied; `None` means the default operator.
    pub operator: Option<&'a str>,
    pub actual: Option<&'a FieldValue>,
    pub expected: Option<&'a FieldValue>,
}

impl<'a> Comparison<'a> {
    pub fn new(field: &'a str) -> Self {
        Self {
            field,
            operator: None,
            actual: None,
            expected: None,
        }
    }

    pub fn with_operator(mut self, operator: &'a str) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_actual(mut self, actual: &'a FieldValue) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_expected(mut self, expected: &'a FieldValue) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Look up the operator token in the registry.
    pub fn resolve_operator(&self) -> Result<Operator, ComparisonError> {
        Operator::resolve(self.operator)
    }
}

/// Evaluate a comparison: resolve the operator, then check arity, coerce and
/// apply the predicate.
pub fn evaluate(comparison: &Comparison<'_>) -> Result<bool, ComparisonError> {
    let operator = comparison.resolve_operator()?;
    evaluate_operator(operator, comparison.actual, comparison.expected)
}

/// Evaluate with an already resolved operator.
pub fn evaluate_operator(
    operator: Operator,
    actual: Option<&FieldValue>,
    expected: Option<&FieldValue>,
) -> Result<bool, ComparisonError> {
    if operator.requires_expected_value() && expected.map_or(true, FieldValue::is_null) {
        return Err(ComparisonError::MissingExpectedValue {
            operator: operator.token().to_string(),
        });
    }

    let pair = coerce(actual, expected, operator)?;
    Ok(apply(operator, &pair))
}

fn apply(operator: Operator, pair: &CoercedPair) -> bool {
    let CoercedPair { actual, expected } = pair;
    match operator {
        Operator::Be => actual.loosely_equals(expected),
        Operator::NotBe => !actual.loosely_equals(expected),
        Operator::Contain => actual.text().contains(&expected.text()),
        Operator::NotContain => !actual.text().contains(&expected.text()),
        Operator::BeGreaterThan => numeric(actual, expected, |a, e| a > e),
        Operator::BeLessThan => numeric(actual, expected, |a, e| a < e),
        Operator::BeOneOf => is_member(actual, expected),
        Operator::NotBeOneOf => !is_member(actual, expected),
        Operator::BeSet => !matches!(actual, Operand::Absent),
        Operator::NotBeSet => matches!(actual, Operand::Absent),
    }
}

fn numeric(actual: &Operand, expected: &Operand, predicate: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), expected.as_number()) {
        (Some(a), Some(e)) => predicate(a, e),
        _ => false,
    }
}

fn is_member(actual: &Operand, expected: &Operand) -> bool {
    match expected {
        Operand::List(items) => items.iter().any(|item| actual.loosely_equals(item)),
        single => actual.loosely_equals(single),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn check(operator: &str, actual: FieldValue, expected: FieldValue) -> Result<bool, ComparisonError> {
        evaluate(
            &Comparison::new("someField")
                .with_operator(operator)
                .with_actual(&actual)
                .with_expected(&expected),
        )
    }

    #[test]
    fn test_every_operator_holds_and_fails_trivially() {
        let cases: Vec<(&str, FieldValue, FieldValue, FieldValue)> = vec![
            ("be", "x".into(), "x".into(), "y".into()),
            ("not be", "x".into(), "y".into(), "x".into()),
            ("contain", "Closed Won".into(), "Won".into(), "Lost".into()),
            ("not contain", "Closed Won".into(), "Lost".into(), "Won".into()),
            ("be greater than", 10i64.into(), 5i64.into(), 15i64.into()),
            ("be less than", 10i64.into(), 15i64.into(), 5i64.into()),
            ("be one of", "b".into(), "a,b,c".into(), "x,y".into()),
            ("not be one of", "b".into(), "x,y".into(), "a,b,c".into()),
        ];

        for (operator, actual, holds, violates) in cases {
            assert!(check(operator, actual.clone(), holds).unwrap(), "{} should hold", operator);
            assert!(!check(operator, actual, violates).unwrap(), "{} should not hold", operator);
        }

        let set = FieldValue::from("value");
        let unset = FieldValue::Null;
        assert!(evaluate(&Comparison::new("f").with_operator("be set").with_actual(&set)).unwrap());
        assert!(!evaluate(&Comparison::new("f").with_operator("be set").with_actual(&unset)).unwrap());
        assert!(evaluate(&Comparison::new("f").with_operator("not be set")).unwrap());
        assert!(!evaluate(&Comparison::new("f").with_operator("not be set").with_actual(&set)).unwrap());
    }

    #[test]
    fn test_negated_pairs_are_exact_negations() {
        let values: Vec<FieldValue> = vec![
            "5000".into(),
            5000i64.into(),
            5000.5f64.into(),
            "Expected Value".into(),
            true.into(),
            "true".into(),
            FieldValue::Null,
        ];
        let pairs = [("be", "not be"), ("contain", "not contain"), ("be one of", "not be one of")];

        for actual in &values {
            for expected in values.iter().filter(|v| !v.is_null()) {
                for (positive, negative) in pairs {
                    let p = check(positive, actual.clone(), expected.clone());
                    let n = check(negative, actual.clone(), expected.clone());
                    if let (Ok(p), Ok(n)) = (p, n) {
                        assert_ne!(p, n, "{:?} {} {:?}", actual, positive, expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_numeric_equality_across_representations() {
        assert!(check("be", 5000i64.into(), "5000".into()).unwrap());
        assert!(check("be", "5000.00".into(), 5000.0f64.into()).unwrap());
        assert!(!check("be", "05000x".into(), 5000i64.into()).unwrap());
        assert!(!check("be", 9007199254740993i64.into(), 9007199254740992i64.into()).unwrap());
        assert!(check("not be", "12345678901234567".into(), "12345678901234568".into()).unwrap());
    }

    #[test]
    fn test_default_operator_is_be() {
        let actual = FieldValue::from("Expected Value");
        let expected = FieldValue::from("Expected Value");
        let comparison = Comparison::new("someField")
            .with_actual(&actual)
            .with_expected(&expected);
        assert!(evaluate(&comparison).unwrap());
    }

    #[test]
    fn test_unknown_operator_checked_before_arity() {
        let comparison = Comparison::new("someField").with_operator("invalid operator");
        assert_matches!(evaluate(&comparison), Err(ComparisonError::UnknownOperator { .. }));
    }

    #[test]
    fn test_missing_expected_value_message() {
        let actual = FieldValue::from("x");
        let comparison = Comparison::new("someField")
            .with_operator("be")
            .with_actual(&actual);
        let err = evaluate(&comparison).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The operator 'be' requires an expected value. Please provide one."
        );
    }

    #[test]
    fn test_relational_with_non_numeric_operand() {
        assert_matches!(
            check("be greater than", 5000i64.into(), "nonNumeric".into()),
            Err(ComparisonError::InvalidOperand { .. })
        );
        assert_matches!(
            check("be less than", "abc".into(), 1i64.into()),
            Err(ComparisonError::InvalidOperand { .. })
        );
    }

    #[test]
    fn test_contain_is_case_sensitive() {
        assert!(!check("contain", "Closed Won".into(), "won".into()).unwrap());
    }
}
