//! # Operand coercion
//!
//! Turns the raw actual and expected values into the typed operands an
//! operator's predicate works on. Pure; no I/O.

use super::comparisons::ComparisonError;
use crate::types::common::FieldValue;
use crate::types::operators::{Operator, OperatorClass};
use std::fmt;

/// A coerced operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Missing, null, or (for presence checks) empty.
    Absent,
    /// Whole number read without loss, compared exactly against other integers.
    Integer(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    List(Vec<Operand>),
}

impl Operand {
    /// Scalar coercion: numeric when the value reads as a number, integral
    /// when it reads as an `i64`.
    pub fn from_scalar(value: Option<&FieldValue>) -> Self {
        match value {
            None | Some(FieldValue::Null) => Self::Absent,
            Some(FieldValue::Boolean(b)) => Self::Boolean(*b),
            Some(v) => match (v.as_integer(), v.as_number()) {
                (Some(i), _) => Self::Integer(i),
                (None, Some(n)) => Self::Number(n),
                (None, None) => Self::Text(v.to_text()),
            },
        }
    }

    /// String form used whenever two operands are compared as text.
    pub fn text(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Integer(i) => i.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Boolean(b) => b.to_string(),
            Self::List(items) => items.iter().map(Operand::text).collect::<Vec<_>>().join(", "),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Loose equality: numeric when both sides are numbers, boolean when one
    /// side is a boolean and the other reads as one, otherwise string.
    pub fn loosely_equals(&self, other: &Operand) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Integer(_) | Self::Number(_), Self::Integer(_) | Self::Number(_)) => {
                match (self.as_number(), other.as_number()) {
                    (Some(a), Some(b)) => numbers_equal(a, b),
                    _ => false,
                }
            }
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Boolean(b), Self::Text(t)) | (Self::Text(t), Self::Boolean(b)) => {
                t.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" })
            }
            (a, b) => a.text() == b.text(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

fn numbers_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Operands ready for an operator's predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedPair {
    pub actual: Operand,
    pub expected: Operand,
}

/// Coerce `actual` and `expected` for `operator`.
///
/// Relational operators need both sides numeric. Membership operators need an
/// expected list with at least one element. Presence operators ignore
/// `expected` entirely.
pub fn coerce(
    actual: Option<&FieldValue>,
    expected: Option<&FieldValue>,
    operator: Operator,
) -> Result<CoercedPair, ComparisonError> {
    match operator.class() {
        OperatorClass::Equality => Ok(CoercedPair {
            actual: Operand::from_scalar(actual),
            expected: Operand::from_scalar(Some(require_expected(expected, operator)?)),
        }),

        OperatorClass::Containment => Ok(CoercedPair {
            actual: Operand::Text(actual.map(FieldValue::to_text).unwrap_or_default()),
            expected: Operand::Text(require_expected(expected, operator)?.to_text()),
        }),

        OperatorClass::Relational => {
            let expected = require_expected(expected, operator)?;
            Ok(CoercedPair {
                actual: numeric_operand(actual, operator)?,
                expected: numeric_operand(Some(expected), operator)?,
            })
        }

        OperatorClass::Membership => {
            let expected = require_expected(expected, operator)?;
            Ok(CoercedPair {
                actual: Operand::from_scalar(actual),
                expected: Operand::List(expected_list(expected, operator)?),
            })
        }

        OperatorClass::Presence => Ok(CoercedPair {
            actual: match actual {
                Some(v) if !v.is_blank() => Operand::from_scalar(Some(v)),
                _ => Operand::Absent,
            },
            expected: Operand::Absent,
        }),
    }
}

fn require_expected(
    expected: Option<&FieldValue>,
    operator: Operator,
) -> Result<&FieldValue, ComparisonError> {
    expected
        .filter(|v| !v.is_null())
        .ok_or_else(|| ComparisonError::MissingExpectedValue {
            operator: operator.token().to_string(),
        })
}

fn numeric_operand(
    value: Option<&FieldValue>,
    operator: Operator,
) -> Result<Operand, ComparisonError> {
    value
        .and_then(FieldValue::as_number)
        .map(Operand::Number)
        .ok_or_else(|| ComparisonError::InvalidOperand {
            value: value.map(FieldValue::to_string).unwrap_or_else(|| "null".to_string()),
            operator,
            reason: "a numeric value is required".to_string(),
        })
}

/// Expected list for membership operators.
///
/// A string that looks like a JSON array is read as one; any other string is
/// split on commas with surrounding whitespace trimmed and empty items dropped.
/// A non-string scalar is a one-element list.
fn expected_list(expected: &FieldValue, operator: Operator) -> Result<Vec<Operand>, ComparisonError> {
    let items: Vec<Operand> = match expected {
        FieldValue::String(s) => {
            let trimmed = s.trim();
            let from_json = trimmed
                .starts_with('[')
                .then(|| serde_json::from_str::<Vec<serde_json::Value>>(trimmed).ok())
                .flatten();
            match from_json {
                Some(values) => values
                    .iter()
                    .map(FieldValue::from_json)
                    .filter(|v| !v.is_blank())
                    .map(|v| Operand::from_scalar(Some(&v)))
                    .collect(),
                None => trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Operand::from_scalar(Some(&FieldValue::from(item))))
                    .collect(),
            }
        }
        other => vec![Operand::from_scalar(Some(other))],
    };

    if items.is_empty() {
        return Err(ComparisonError::InvalidOperand {
            value: expected.to_string(),
            operator,
            reason: "a non-empty list of values is required".to_string(),
        });
    }
    Ok(items)
}
