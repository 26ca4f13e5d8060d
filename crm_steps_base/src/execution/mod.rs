pub mod coercion;
pub mod comparisons;
pub mod field_check;
pub mod outcome;

// Comparison utilities
pub use coercion::{coerce, CoercedPair, Operand};
pub use comparisons::{evaluate, evaluate_operator, Comparison, ComparisonError};
// Outcome construction and the validation adapter
pub use field_check::{FieldCheck, FieldCheckResult, Matches, ValidationPhase};
pub use outcome::{comparison_error, MissingFieldPolicy, OutcomeBuilder};
