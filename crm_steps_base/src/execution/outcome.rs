//! # Step outcome construction
//!
//! Maps each branch of a field validation (no match, several matches,
//! missing field, comparison verdict, comparison error, upstream failure)
//! onto exactly one `Outcome`.

use super::comparisons::{evaluate_operator, Comparison, ComparisonError};
use crate::results::Outcome;
use crate::types::common::FieldValue;
use crate::types::operators::Operator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome kind used when the found record lacks the checked field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// A schema problem: the assertion cannot be evaluated.
    #[default]
    Error,
    /// A false assertion.
    Fail,
}

impl MissingFieldPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Fail => "fail",
        }
    }
}

impl std::str::FromStr for MissingFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "fail" => Ok(Self::Fail),
            other => Err(format!(
                "Invalid missing field policy '{}'. Valid values: error, fail",
                other
            )),
        }
    }
}

impl fmt::Display for MissingFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const MISSING_EXPECTED_TEMPLATE: &str =
    "The operator '%s' requires an expected value. Please provide one.";
pub const UNKNOWN_OPERATOR_TEMPLATE: &str = "%s Please provide one of: %s";
pub const NO_MATCH_TEMPLATE: &str = "No %s matches %s %s";
pub const MULTIPLE_MATCHES_TEMPLATE: &str = "More than one %s matches %s %s";
pub const MISSING_FIELD_TEMPLATE: &str = "The %s field does not exist on %s %s";
pub const UPSTREAM_FAILURE_TEMPLATE: &str = "There was a problem checking the %s: %s";

/// Builds outcomes for one looked-up record kind and identifier.
#[derive(Debug, Clone)]
pub struct OutcomeBuilder<'a> {
    pub kind: &'a str,
    pub id_field: &'a str,
    pub identifier: &'a FieldValue,
}

impl<'a> OutcomeBuilder<'a> {
    pub fn new(kind: &'a str, id_field: &'a str, identifier: &'a FieldValue) -> Self {
        Self {
            kind,
            id_field,
            identifier,
        }
    }

    pub fn no_match(&self) -> Outcome {
        Outcome::fail(
            NO_MATCH_TEMPLATE,
            vec![self.kind.into(), self.id_field.into(), self.identifier.clone()],
        )
    }

    pub fn multiple_matches(&self) -> Outcome {
        Outcome::error(
            MULTIPLE_MATCHES_TEMPLATE,
            vec![self.kind.into(), self.id_field.into(), self.identifier.clone()],
        )
    }

    pub fn missing_field(&self, field: &str, policy: MissingFieldPolicy) -> Outcome {
        let args = vec![field.into(), self.kind.into(), self.identifier.clone()];
        match policy {
            MissingFieldPolicy::Error => Outcome::error(MISSING_FIELD_TEMPLATE, args),
            MissingFieldPolicy::Fail => Outcome::fail(MISSING_FIELD_TEMPLATE, args),
        }
    }

    pub fn upstream_failure(&self, error: &dyn fmt::Display) -> Outcome {
        Outcome::error(
            UPSTREAM_FAILURE_TEMPLATE,
            vec![self.kind.into(), error.to_string().into()],
        )
    }

    /// Evaluate the comparison and turn the verdict or error into an outcome.
    pub fn from_comparison(&self, comparison: &Comparison<'_>) -> Outcome {
        let verdict = comparison
            .resolve_operator()
            .and_then(|op| evaluate_operator(op, comparison.actual, comparison.expected).map(|held| (op, held)));

        match verdict {
            Ok((operator, held)) => verdict_outcome(operator, held, comparison),
            Err(error) => comparison_error(&error),
        }
    }
}

fn verdict_outcome(operator: Operator, held: bool, comparison: &Comparison<'_>) -> Outcome {
    let field = FieldValue::from(comparison.field);
    let expected = comparison.expected.cloned().unwrap_or(FieldValue::Null);
    if held {
        Outcome::pass(operator.success_template(), vec![field, expected])
    } else {
        let actual = comparison.actual.cloned().unwrap_or(FieldValue::Null);
        Outcome::fail(operator.fail_template(), vec![field, expected, actual])
    }
}

/// Error outcome for a comparison that could not be evaluated.
pub fn comparison_error(error: &ComparisonError) -> Outcome {
    match error {
        ComparisonError::UnknownOperator { .. } => Outcome::error(
            UNKNOWN_OPERATOR_TEMPLATE,
            vec![error.to_string().into(), Operator::valid_tokens().into()],
        ),
        ComparisonError::MissingExpectedValue { operator } => {
            Outcome::error(MISSING_EXPECTED_TEMPLATE, vec![operator.as_str().into()])
        }
        ComparisonError::InvalidOperand { .. } => Outcome::error(error.to_string(), vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::OutcomeKind;

    fn builder(identifier: &FieldValue) -> OutcomeBuilder<'_> {
        OutcomeBuilder::new("Opportunity", "Name", identifier)
    }

    #[test]
    fn test_lookup_branches() {
        let id = FieldValue::from("Big Deal");
        let b = builder(&id);

        let none = b.no_match();
        assert_eq!(none.kind, OutcomeKind::Fail);
        assert_eq!(none.render(), "No Opportunity matches Name Big Deal");

        let many = b.multiple_matches();
        assert_eq!(many.kind, OutcomeKind::Error);
        assert_eq!(many.render(), "More than one Opportunity matches Name Big Deal");

        assert_eq!(b.missing_field("Amount", MissingFieldPolicy::Error).kind, OutcomeKind::Error);
        let missing = b.missing_field("Amount", MissingFieldPolicy::Fail);
        assert_eq!(missing.kind, OutcomeKind::Fail);
        assert_eq!(missing.render(), "The Amount field does not exist on Opportunity Big Deal");

        let upstream = b.upstream_failure(&"Any error");
        assert_eq!(upstream.render(), "There was a problem checking the Opportunity: Any error");
    }

    #[test]
    fn test_pass_and_fail_arguments() {
        let id = FieldValue::from("x");
        let actual = FieldValue::Integer(5000);
        let expected = FieldValue::from("4000");

        let pass = builder(&id).from_comparison(
            &Comparison::new("Amount")
                .with_operator("be greater than")
                .with_actual(&actual)
                .with_expected(&expected),
        );
        assert_eq!(pass.kind, OutcomeKind::Pass);
        assert_eq!(pass.args, vec!["Amount".into(), expected.clone()]);

        let fail = builder(&id).from_comparison(
            &Comparison::new("Amount")
                .with_operator("be less than")
                .with_actual(&actual)
                .with_expected(&expected),
        );
        assert_eq!(fail.kind, OutcomeKind::Fail);
        assert_eq!(fail.args, vec!["Amount".into(), expected, actual]);
        assert_eq!(
            fail.render(),
            "Expected Amount field to be less than 4000, but it was 5000."
        );
    }

    #[test]
    fn test_unknown_operator_lists_all_tokens() {
        let id = FieldValue::from("x");
        let actual = FieldValue::from("a");
        let expected = FieldValue::from("a");
        let outcome = builder(&id).from_comparison(
            &Comparison::new("Name")
                .with_operator("invalid operator")
                .with_actual(&actual)
                .with_expected(&expected),
        );
        assert_eq!(outcome.kind, OutcomeKind::Error);
        let rendered = outcome.render();
        for op in Operator::ALL {
            assert!(rendered.contains(op.token()));
        }
        assert!(rendered.starts_with("Unknown operator 'invalid operator'. Please provide one of: be, not be"));
    }

    #[test]
    fn test_invalid_operand_uses_error_text() {
        let id = FieldValue::from("x");
        let actual = FieldValue::Integer(5000);
        let expected = FieldValue::from("nonNumeric");
        let outcome = builder(&id).from_comparison(
            &Comparison::new("numericField")
                .with_operator("be greater than")
                .with_actual(&actual)
                .with_expected(&expected),
        );
        assert_eq!(outcome.kind, OutcomeKind::Error);
        assert!(outcome.args.is_empty());
        assert!(outcome.message_template.contains("nonNumeric"));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("FAIL".parse::<MissingFieldPolicy>().unwrap(), MissingFieldPolicy::Fail);
        assert!("sometimes".parse::<MissingFieldPolicy>().is_err());
        assert_eq!(MissingFieldPolicy::default(), MissingFieldPolicy::Error);
    }
}
