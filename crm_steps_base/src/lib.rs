//! # CRM Steps Base
//!
//! Field-comparison engine and step scaffolding for CRM test steps.
//!
//! A validation step looks up one record through an external finder, compares
//! one of its fields to an expected value with a natural-language operator
//! ("be", "not contain", "be greater than", ...) and reports a single
//! Pass / Fail / Error outcome with a `%s` message template.
//!
//! ```
//! use crm_steps_base::execution::{evaluate, Comparison};
//! use crm_steps_base::types::FieldValue;
//!
//! let actual = FieldValue::from(5000);
//! let expected = FieldValue::from("1000");
//! let comparison = Comparison::new("Amount")
//!     .with_operator("be greater than")
//!     .with_actual(&actual)
//!     .with_expected(&expected);
//! assert_eq!(evaluate(&comparison), Ok(true));
//! ```

pub mod api;
pub mod execution;
pub mod logging;
pub mod results;
pub mod strategies;
pub mod types;

pub use api::*;

pub mod prelude {
    pub use crate::api::{RunnerConfig, Scenario, ScenarioRunner};

    pub use crate::execution::{
        evaluate, Comparison, ComparisonError, FieldCheck, Matches, MissingFieldPolicy,
    };

    pub use crate::results::{Outcome, OutcomeKind, ScenarioReport, StepRecord, StepResult};

    pub use crate::strategies::{
        operator_clause, operator_fields, FieldDefinition, FieldType, RecordDefinition, Step,
        StepDefinition, StepRegistry, StepType, StrategyError,
    };

    pub use crate::types::{FieldValue, Operator, Record, ScenarioContext, StepData};
}
