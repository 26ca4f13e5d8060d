//! # Field validation adapter
//!
//! Runs one validation pass for a field-comparison step:
//! `Idle -> Fetching -> Evaluating -> Resolved`.
//!
//! - `Idle` checks the inputs that can be judged without a lookup.
//! - `Fetching` calls the record finder once. A finder error resolves
//!   immediately with an Error outcome.
//! - `Evaluating` checks, in order: no match, several matches, missing field,
//!   then the comparison itself.
//! - `Resolved` is terminal and holds exactly one outcome.
//!
//! Nothing escapes the adapter as an error; every failure becomes an outcome.

use super::comparisons::Comparison;
use super::outcome::{MissingFieldPolicy, OutcomeBuilder, MISSING_EXPECTED_TEMPLATE};
use crate::results::Outcome;
use crate::types::common::{FieldValue, Record};
use crate::types::operators::Operator;
use crate::{log_debug, log_warning};
use serde::Serialize;
use std::fmt;

/// Phase of a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationPhase {
    Idle,
    Fetching,
    Evaluating,
    Resolved,
}

impl fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Evaluating => "evaluating",
            Self::Resolved => "resolved",
        };
        write!(f, "{}", name)
    }
}

/// What a finder returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Matches {
    None,
    One(Record),
    Many(Vec<Record>),
}

impl From<Option<Record>> for Matches {
    fn from(record: Option<Record>) -> Self {
        match record {
            Some(r) => Self::One(r),
            None => Self::None,
        }
    }
}

impl From<Record> for Matches {
    fn from(record: Record) -> Self {
        Self::One(record)
    }
}

impl From<Vec<Record>> for Matches {
    fn from(mut records: Vec<Record>) -> Self {
        match records.len() {
            0 => Self::None,
            1 => Self::One(records.remove(0)),
            _ => Self::Many(records),
        }
    }
}

/// Result of a validation pass.
#[derive(Debug, Clone)]
pub struct FieldCheckResult {
    pub outcome: Outcome,
    /// Phase in which the outcome was decided.
    pub decided_in: ValidationPhase,
    /// Final phase; always `Resolved`.
    pub phase: ValidationPhase,
    /// The single matched record, when one was found.
    pub record: Option<Record>,
}

/// Inputs of one field validation.
#[derive(Debug, Clone)]
pub struct FieldCheck<'a> {
    /// Record kind used in messages, e.g. `Opportunity`.
    pub kind: &'a str,
    pub id_field: &'a str,
    pub identifier: &'a FieldValue,
    pub field: &'a str,
    pub operator: Option<&'a str>,
    pub expected: Option<&'a FieldValue>,
    pub missing_field_policy: MissingFieldPolicy,
}

impl<'a> FieldCheck<'a> {
    pub fn new(kind: &'a str, id_field: &'a str, identifier: &'a FieldValue, field: &'a str) -> Self {
        Self {
            kind,
            id_field,
            identifier,
            field,
            operator: None,
            expected: None,
            missing_field_policy: MissingFieldPolicy::default(),
        }
    }

    pub fn with_operator(mut self, operator: Option<&'a str>) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_expected(mut self, expected: Option<&'a FieldValue>) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = policy;
        self
    }

    fn builder(&self) -> OutcomeBuilder<'a> {
        OutcomeBuilder::new(self.kind, self.id_field, self.identifier)
    }

    /// Outcome for inputs that are invalid before any lookup.
    ///
    /// An operator that is unknown or needs an expected value is rejected here
    /// when no expected value was supplied, without consulting the finder.
    pub fn precheck(&self) -> Option<Outcome> {
        let needs_expected = Operator::resolve(self.operator)
            .map(Operator::requires_expected_value)
            .unwrap_or(true);
        let has_expected = self.expected.map_or(false, |v| !v.is_null());

        if needs_expected && !has_expected {
            let token = self
                .operator
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(Operator::DEFAULT.token());
            return Some(Outcome::error(MISSING_EXPECTED_TEMPLATE, vec![token.into()]));
        }
        None
    }

    /// Run the full pass with `fetch` as the single finder call.
    pub fn run<F, M, E>(&self, fetch: F) -> FieldCheckResult
    where
        F: FnOnce() -> Result<M, E>,
        M: Into<Matches>,
        E: fmt::Display,
    {
        let mut phase = ValidationPhase::Idle;

        if let Some(outcome) = self.precheck() {
            return self.resolve(outcome, phase, None);
        }

        phase = self.transition(phase, ValidationPhase::Fetching);
        let matches = match fetch() {
            Ok(found) => found.into(),
            Err(e) => {
                log_warning!("Record lookup failed",
                    "kind" => self.kind,
                    "error" => e
                );
                return self.resolve(self.builder().upstream_failure(&e), phase, None);
            }
        };

        phase = self.transition(phase, ValidationPhase::Evaluating);
        let record = match matches {
            Matches::None => return self.resolve(self.builder().no_match(), phase, None),
            Matches::Many(_) => return self.resolve(self.builder().multiple_matches(), phase, None),
            Matches::One(record) => record,
        };

        if !record.has_field(self.field) {
            let outcome = self.builder().missing_field(self.field, self.missing_field_policy);
            return self.resolve(outcome, phase, Some(record));
        }

        let mut comparison = Comparison::new(self.field);
        comparison.operator = self.operator;
        comparison.actual = record.get(self.field);
        comparison.expected = self.expected;
        let outcome = self.builder().from_comparison(&comparison);

        self.resolve(outcome, phase, Some(record))
    }

    fn transition(&self, from: ValidationPhase, to: ValidationPhase) -> ValidationPhase {
        log_debug!("Field check phase change",
            "kind" => self.kind,
            "field" => self.field,
            "from" => from,
            "to" => to
        );
        to
    }

    fn resolve(
        &self,
        outcome: Outcome,
        decided_in: ValidationPhase,
        record: Option<Record>,
    ) -> FieldCheckResult {
        let phase = self.transition(decided_in, ValidationPhase::Resolved);
        FieldCheckResult {
            outcome,
            decided_in,
            phase,
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::OutcomeKind;

    fn record() -> Record {
        Record::new()
            .with_field("Id", "006A")
            .with_field("someField", "Expected Value")
            .with_field("numericField", 5000i64)
    }

    fn ok(records: Vec<Record>) -> impl FnOnce() -> Result<Vec<Record>, String> {
        move || Ok(records)
    }

    #[test]
    fn test_pass_with_default_operator() {
        let id = FieldValue::from("006A");
        let expected = FieldValue::from("Expected Value");
        let result = FieldCheck::new("Opportunity", "Id", &id, "someField")
            .with_expected(Some(&expected))
            .run(ok(vec![record()]));

        assert_eq!(result.outcome.kind, OutcomeKind::Pass);
        assert_eq!(result.decided_in, ValidationPhase::Evaluating);
        assert_eq!(result.phase, ValidationPhase::Resolved);
        assert!(result.record.is_some());
    }

    #[test]
    fn test_invalid_operand_is_error() {
        let id = FieldValue::from("006A");
        let expected = FieldValue::from("nonNumeric");
        let result = FieldCheck::new("Opportunity", "Id", &id, "numericField")
            .with_operator(Some("be greater than"))
            .with_expected(Some(&expected))
            .run(ok(vec![record()]));
        assert_eq!(result.outcome.kind, OutcomeKind::Error);
    }

    #[test]
    fn test_lookup_branches() {
        let id = FieldValue::from("006A");
        let expected = FieldValue::from("x");
        let check = FieldCheck::new("Opportunity", "Id", &id, "someOtherField")
            .with_expected(Some(&expected));

        assert_eq!(check.run(ok(vec![])).outcome.kind, OutcomeKind::Fail);
        assert_eq!(check.run(ok(vec![record(), record()])).outcome.kind, OutcomeKind::Error);
        assert_eq!(check.run(ok(vec![record()])).outcome.kind, OutcomeKind::Error);

        let lenient = check.clone().with_missing_field_policy(MissingFieldPolicy::Fail);
        assert_eq!(lenient.run(ok(vec![record()])).outcome.kind, OutcomeKind::Fail);
    }

    #[test]
    fn test_fetch_failure_skips_evaluation() {
        let id = FieldValue::from("006A");
        let expected = FieldValue::from("x");
        let result = FieldCheck::new("Opportunity", "Id", &id, "someField")
            .with_expected(Some(&expected))
            .run(|| Err::<Option<Record>, _>("Any error"));

        assert_eq!(result.outcome.kind, OutcomeKind::Error);
        assert_eq!(result.decided_in, ValidationPhase::Fetching);
        assert_eq!(
            result.outcome.render(),
            "There was a problem checking the Opportunity: Any error"
        );
    }

    #[test]
    fn test_missing_expected_value_resolves_before_fetch() {
        let id = FieldValue::from("006A");
        let mut fetched = false;
        let result = FieldCheck::new("CCIO", "id", &id, "someField")
            .with_operator(Some("anyOperator"))
            .run(|| {
                fetched = true;
                Ok::<_, String>(Some(record()))
            });

        assert!(!fetched);
        assert_eq!(result.decided_in, ValidationPhase::Idle);
        assert_eq!(result.outcome.kind, OutcomeKind::Error);
        assert_eq!(
            result.outcome.message_template,
            "The operator '%s' requires an expected value. Please provide one."
        );
        assert_eq!(result.outcome.args, vec![FieldValue::from("anyOperator")]);
    }

    #[test]
    fn test_presence_operator_needs_no_expected_value() {
        let id = FieldValue::from("006A");
        let result = FieldCheck::new("Opportunity", "Id", &id, "someField")
            .with_operator(Some("be set"))
            .run(|| Ok::<_, String>(Some(record())));
        assert_eq!(result.outcome.kind, OutcomeKind::Pass);
    }

    #[test]
    fn test_unknown_operator_with_expected_value() {
        let id = FieldValue::from("006A");
        let expected = FieldValue::from("Expected Value");
        let result = FieldCheck::new("Opportunity", "Id", &id, "someField")
            .with_operator(Some("invalid operator"))
            .with_expected(Some(&expected))
            .run(ok(vec![record()]));
        assert_eq!(result.outcome.kind, OutcomeKind::Error);
        assert!(result.outcome.render().contains("Please provide one of: be, not be"));
    }
}
