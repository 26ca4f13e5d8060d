// src/strategies/registry.rs
//! Step registry
//!
//! Central registration and lookup of steps, with definition validation on
//! registration and input validation before each invocation.

use crate::logging::codes;
use crate::results::{Outcome, OutcomeKind, StepResult};
use crate::strategies::definition::{StepDefinition, StepType};
use crate::strategies::errors::StrategyError;
use crate::strategies::traits::Step;
use crate::strategies::validation::StepDefinitionValidator;
use crate::types::{ScenarioContext, StepData, StepInputError};
use crate::{log_debug, log_error, log_success, log_warning};
use std::collections::BTreeMap;

pub const MISSING_INPUT_TEMPLATE: &str = "Missing required field '%s' for step %s";
pub const INVALID_INPUT_TEMPLATE: &str = "Invalid input for step %s: %s";

/// Registry of runnable steps keyed by step id
pub struct StepRegistry {
    steps: BTreeMap<String, Box<dyn Step>>,
    validate_definitions: bool,
}

impl StepRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            steps: BTreeMap::new(),
            validate_definitions: true,
        }
    }

    /// Create registry with definition validation disabled (for testing)
    pub fn new_unvalidated() -> Self {
        let mut registry = Self::new();
        registry.validate_definitions = false;
        registry
    }

    pub fn register(&mut self, step: Box<dyn Step>) -> Result<(), StrategyError> {
        let step_id = step.step_id().to_string();

        if self.steps.contains_key(&step_id) {
            log_error!(codes::registry::DUPLICATE_STEP, "Step registered twice",
                "step_id" => step_id
            );
            return Err(StrategyError::DuplicateStep { step_id });
        }

        if self.validate_definitions {
            if let Err(e) = StepDefinitionValidator::validate_definition(step.definition()) {
                log_error!(codes::registry::INVALID_DEFINITION, "Step definition rejected",
                    "step_id" => step_id,
                    "reason" => e
                );
                return Err(e.into());
            }
        }

        log_debug!("Step registered", "step_id" => step_id);
        self.steps.insert(step_id, step);
        Ok(())
    }

    pub fn get(&self, step_id: &str) -> Result<&dyn Step, StrategyError> {
        self.steps
            .get(step_id)
            .map(|s| s.as_ref())
            .ok_or_else(|| StrategyError::UnknownStep(step_id.to_string()))
    }

    pub fn has_step(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }

    /// Step ids in sorted order
    pub fn list_step_ids(&self) -> Vec<String> {
        self.steps.keys().cloned().collect()
    }

    pub fn definitions(&self) -> Vec<&StepDefinition> {
        self.steps.values().map(|s| s.definition()).collect()
    }

    /// Run one invocation of a registered step.
    ///
    /// Input problems become an Error outcome; only an unknown step id is
    /// returned as an error.
    pub fn run(
        &self,
        step_id: &str,
        data: &StepData,
        context: &ScenarioContext,
    ) -> Result<StepResult, StrategyError> {
        let step = self.get(step_id).map_err(|e| {
            log_error!(codes::registry::UNKNOWN_STEP, "Unknown step requested",
                "step_id" => step_id
            );
            e
        })?;

        if let Err(e) = StepDefinitionValidator::validate_inputs(step.definition(), data) {
            log_error!(codes::input::INVALID_STEP_INPUT, "Step input rejected",
                "step_id" => step_id,
                "reason" => e
            );
            return Ok(input_error_outcome(step_id, &e).into());
        }

        let result = step.execute(data, context);
        match result.outcome.kind {
            OutcomeKind::Pass => log_success!(codes::success::STEP_PASSED, "Step passed",
                "step_id" => step_id,
                "message" => result.outcome.render()
            ),
            OutcomeKind::Fail => log_warning!("Step failed",
                "step_id" => step_id,
                "message" => result.outcome.render()
            ),
            OutcomeKind::Error => log_error!(codes::scenario::STEP_ERRORED, "Step could not be evaluated",
                "step_id" => step_id,
                "message" => result.outcome.render()
            ),
        }
        Ok(result)
    }

    pub fn get_statistics(&self) -> RegistryStatistics {
        let validation_steps = self
            .steps
            .values()
            .filter(|s| s.step_type() == StepType::Validation)
            .count();
        RegistryStatistics {
            total_steps: self.steps.len(),
            validation_steps,
            action_steps: self.steps.len() - validation_steps,
            steps_emitting_records: self
                .steps
                .values()
                .filter(|s| !s.definition().expected_records.is_empty())
                .count(),
            registry_health: self.assess_registry_health(),
        }
    }

    fn assess_registry_health(&self) -> RegistryHealth {
        if self.steps.is_empty() {
            return RegistryHealth::Empty;
        }

        let has_invalid = self
            .steps
            .values()
            .any(|s| StepDefinitionValidator::validate_definition(s.definition()).is_err());

        if has_invalid {
            RegistryHealth::Unhealthy
        } else {
            RegistryHealth::Healthy
        }
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Error outcome for step inputs that are missing or mistyped.
pub fn input_error_outcome(step_id: &str, error: &StepInputError) -> Outcome {
    match error {
        StepInputError::MissingField { field } => Outcome::error(
            MISSING_INPUT_TEMPLATE,
            vec![field.as_str().into(), step_id.into()],
        ),
        other => Outcome::error(
            INVALID_INPUT_TEMPLATE,
            vec![step_id.into(), other.to_string().into()],
        ),
    }
}

// ============================================================================
// Supporting Data Structures
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegistryStatistics {
    pub total_steps: usize,
    pub validation_steps: usize,
    pub action_steps: usize,
    pub steps_emitting_records: usize,
    pub registry_health: RegistryHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryHealth {
    Healthy,   // All definitions valid
    Unhealthy, // Some definition fails validation
    Empty,     // No registrations
}

impl RegistryHealth {
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Empty => "empty",
        }
    }
}

// ============================================================================
// Registry Builder
// ============================================================================

/// Fluent registry construction
pub struct RegistryBuilder {
    registry: StepRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: StepRegistry::new(),
        }
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.registry.validate_definitions = enabled;
        self
    }

    pub fn add_step(mut self, step: Box<dyn Step>) -> Result<Self, StrategyError> {
        self.registry.register(step)?;
        Ok(self)
    }

    pub fn build(self) -> StepRegistry {
        self.registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
