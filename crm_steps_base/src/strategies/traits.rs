// src/strategies/traits.rs
//! Step trait implemented by every concrete step.

use crate::results::StepResult;
use crate::strategies::definition::{StepDefinition, StepType};
use crate::types::{ScenarioContext, StepData};

/// A runnable step.
///
/// Implementations hold no per-invocation state, so one instance may execute
/// many invocations concurrently.
pub trait Step: Send + Sync {
    /// Static contract of the step.
    fn definition(&self) -> &StepDefinition;

    /// Execute one invocation. Every failure is reported through the returned
    /// outcome; nothing is raised.
    fn execute(&self, data: &StepData, context: &ScenarioContext) -> StepResult;

    fn step_id(&self) -> &str {
        &self.definition().step_id
    }

    fn step_type(&self) -> StepType {
        self.definition().step_type
    }
}
