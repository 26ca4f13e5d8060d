// src/strategies/mod.rs
//! Step strategy module
//!
//! This module provides the foundation for pluggable test steps:
//! - **Step definitions** declare a step's id, expression, inputs and records
//! - **Steps** implement [`Step`] and turn inputs into an outcome
//! - **Registry** validates definitions and dispatches invocations
//!
//! # Example Usage
//!
//! ```
//! use crm_steps_base::strategies::{create_registry, StepDefinition, StepType};
//!
//! let registry = create_registry();
//! assert!(registry.list_step_ids().is_empty());
//!
//! let definition = StepDefinition::new(
//!     "DeleteLead",
//!     "Delete a Salesforce Lead",
//!     "delete the (?<email>.+) salesforce lead",
//!     StepType::Action,
//! );
//! assert_eq!(definition.step_type, StepType::Action);
//! ```

pub mod definition;
pub mod errors;
pub mod registry;
pub mod traits;
pub mod validation;

pub use definition::{
    operator_clause, operator_fields, FieldDefinition, FieldType, Optionality, RecordDefinition,
    StepDefinition, StepType,
};

pub use errors::{DefinitionError, StrategyError};

pub use registry::{
    input_error_outcome, RegistryBuilder, RegistryHealth, RegistryStatistics, StepRegistry,
};

pub use traits::Step;

pub use validation::StepDefinitionValidator;

/// Create a new step registry with definition validation enabled
pub fn create_registry() -> StepRegistry {
    StepRegistry::new()
}

/// Create a registry builder for fluent configuration
pub fn registry_builder() -> RegistryBuilder {
    RegistryBuilder::new()
}

/// Validate a step definition for consistency
pub fn validate_definition(definition: &StepDefinition) -> Result<(), DefinitionError> {
    StepDefinitionValidator::validate_definition(definition)
}
