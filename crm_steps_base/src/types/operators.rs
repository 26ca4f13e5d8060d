//! # Comparison operators
//!
//! The fixed operator table. Each operator carries its step-expression token,
//! whether it needs an expected value, and its pass/fail message templates.
//! Templates use positional `%s` placeholders: pass templates receive
//! `[field, expected]`, fail templates `[field, expected, actual]`.

use crate::execution::comparisons::ComparisonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator usable in a field validation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Be,
    NotBe,
    Contain,
    NotContain,
    BeGreaterThan,
    BeLessThan,
    BeOneOf,
    NotBeOneOf,
    BeSet,
    NotBeSet,
}

/// How an operator's operands are coerced before the predicate runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    /// Numeric when both sides are numeric, otherwise string.
    Equality,
    /// Substring containment on string forms.
    Containment,
    /// Numeric ordering only.
    Relational,
    /// Membership in an expected list.
    Membership,
    /// Presence of the actual value.
    Presence,
}

impl Operator {
    /// Registry order. Used for token listings in error messages.
    pub const ALL: [Operator; 10] = [
        Operator::Be,
        Operator::NotBe,
        Operator::Contain,
        Operator::NotContain,
        Operator::BeGreaterThan,
        Operator::BeLessThan,
        Operator::BeOneOf,
        Operator::NotBeOneOf,
        Operator::BeSet,
        Operator::NotBeSet,
    ];

    /// Operator applied when a step omits one.
    pub const DEFAULT: Operator = Operator::Be;

    pub fn token(self) -> &'static str {
        match self {
            Self::Be => "be",
            Self::NotBe => "not be",
            Self::Contain => "contain",
            Self::NotContain => "not contain",
            Self::BeGreaterThan => "be greater than",
            Self::BeLessThan => "be less than",
            Self::BeOneOf => "be one of",
            Self::NotBeOneOf => "not be one of",
            Self::BeSet => "be set",
            Self::NotBeSet => "not be set",
        }
    }

    pub fn class(self) -> OperatorClass {
        match self {
            Self::Be | Self::NotBe => OperatorClass::Equality,
            Self::Contain | Self::NotContain => OperatorClass::Containment,
            Self::BeGreaterThan | Self::BeLessThan => OperatorClass::Relational,
            Self::BeOneOf | Self::NotBeOneOf => OperatorClass::Membership,
            Self::BeSet | Self::NotBeSet => OperatorClass::Presence,
        }
    }

    pub fn requires_expected_value(self) -> bool {
        !matches!(self.class(), OperatorClass::Presence)
    }

    /// Short description of the predicate, used in step listings.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Be => "equality (numeric if both numeric, else string)",
            Self::NotBe => "negated equality",
            Self::Contain => "substring containment",
            Self::NotContain => "negated containment",
            Self::BeGreaterThan => "numeric greater than",
            Self::BeLessThan => "numeric less than",
            Self::BeOneOf => "membership in expected list",
            Self::NotBeOneOf => "non-membership in expected list",
            Self::BeSet => "actual is present and non-empty",
            Self::NotBeSet => "actual is absent or empty",
        }
    }

    pub fn success_template(self) -> &'static str {
        match self {
            Self::Be => "The %s field was set to %s, as expected.",
            Self::NotBe => "The %s field was not set to %s, as expected.",
            Self::Contain => "The %s field contains %s, as expected.",
            Self::NotContain => "The %s field does not contain %s, as expected.",
            Self::BeGreaterThan => "The %s field is greater than %s, as expected.",
            Self::BeLessThan => "The %s field is less than %s, as expected.",
            Self::BeOneOf => "The %s field is one of %s, as expected.",
            Self::NotBeOneOf => "The %s field is not one of %s, as expected.",
            Self::BeSet => "The %s field was set, as expected.",
            Self::NotBeSet => "The %s field was not set, as expected.",
        }
    }

    pub fn fail_template(self) -> &'static str {
        match self {
            Self::Be => "Expected %s field to be %s, but it was actually %s.",
            Self::NotBe => "Expected %s field not to be %s, but it was also %s.",
            Self::Contain => "Expected %s field to contain %s, but it is not contained in %s.",
            Self::NotContain => "Expected %s field not to contain %s, but it is contained in %s.",
            Self::BeGreaterThan => "Expected %s field to be greater than %s, but it was %s.",
            Self::BeLessThan => "Expected %s field to be less than %s, but it was %s.",
            Self::BeOneOf => "Expected %s field to be one of %s, but it was %s.",
            Self::NotBeOneOf => "Expected %s field not to be one of %s, but it was %s.",
            Self::BeSet => "Expected %s field to be set, but it was not.",
            Self::NotBeSet => "Expected %s field not to be set, but it was set.",
        }
    }

    /// Resolve an optional token, falling back to [`Operator::DEFAULT`] when
    /// the token is missing or blank.
    pub fn resolve(token: Option<&str>) -> Result<Operator, ComparisonError> {
        match token {
            Some(t) if !t.trim().is_empty() => t.parse(),
            _ => Ok(Self::DEFAULT),
        }
    }

    /// All tokens in registry order, joined with `", "`.
    pub fn valid_tokens() -> String {
        Self::ALL
            .iter()
            .map(|op| op.token())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Regex alternation of every token, longest first so that prefixes such
    /// as `be` never shadow `be set` or `be greater than`.
    pub fn expression_alternation() -> String {
        let mut tokens: Vec<&str> = Self::ALL.iter().map(|op| op.token()).collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.join("|")
    }
}

impl FromStr for Operator {
    type Err = ComparisonError;

    /// Tokens match case-insensitively with internal whitespace collapsed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.token() == normalized)
            .ok_or_else(|| ComparisonError::UnknownOperator {
                token: s.to_string(),
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_token_round_trip_through_parse() {
        for op in Operator::ALL {
            assert_eq!(op.token().parse::<Operator>().unwrap(), op);
        }
        assert_eq!("  Be   Greater  Than ".parse::<Operator>().unwrap(), Operator::BeGreaterThan);
    }

    #[test]
    fn test_unknown_token() {
        assert_matches!(
            "invalid operator".parse::<Operator>(),
            Err(ComparisonError::UnknownOperator { token }) if token == "invalid operator"
        );
    }

    #[test]
    fn test_resolve_defaults_to_be() {
        assert_eq!(Operator::resolve(None).unwrap(), Operator::Be);
        assert_eq!(Operator::resolve(Some("  ")).unwrap(), Operator::Be);
        assert_eq!(Operator::resolve(Some("contain")).unwrap(), Operator::Contain);
    }

    #[test]
    fn test_valid_tokens_listing() {
        assert_eq!(
            Operator::valid_tokens(),
            "be, not be, contain, not contain, be greater than, be less than, \
             be one of, not be one of, be set, not be set"
        );
    }

    #[test]
    fn test_alternation_puts_longer_tokens_first() {
        let alternation = Operator::expression_alternation();
        let tokens: Vec<&str> = alternation.split('|').collect();
        assert_eq!(tokens.len(), 10);
        let be = tokens.iter().position(|t| *t == "be").unwrap();
        let be_set = tokens.iter().position(|t| *t == "be set").unwrap();
        let not_be = tokens.iter().position(|t| *t == "not be").unwrap();
        let not_be_one_of = tokens.iter().position(|t| *t == "not be one of").unwrap();
        assert!(be_set < be);
        assert!(not_be_one_of < not_be);
    }

    #[test]
    fn test_presence_operators_need_no_expected_value() {
        let optional: Vec<Operator> = Operator::ALL
            .iter()
            .copied()
            .filter(|op| !op.requires_expected_value())
            .collect();
        assert_eq!(optional, vec![Operator::BeSet, Operator::NotBeSet]);
    }

    #[test]
    fn test_every_operator_is_described() {
        let descriptions: std::collections::HashSet<&str> =
            Operator::ALL.iter().map(|op| op.describe()).collect();
        assert_eq!(descriptions.len(), Operator::ALL.len());
        assert_eq!(Operator::BeGreaterThan.describe(), "numeric greater than");
    }
}
