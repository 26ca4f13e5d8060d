//! Inputs shared by every field validation step.

use crm_steps_base::execution::{FieldCheck, MissingFieldPolicy};
use crm_steps_base::results::StepResult;
use crm_steps_base::strategies::input_error_outcome;
use crm_steps_base::types::{FieldValue, StepData, StepInputError};

/// `field`, `operator` and `expectedValue` as read from step data
#[derive(Debug, Clone)]
pub(crate) struct CheckInputs {
    pub field: String,
    pub operator: Option<String>,
    pub expected: Option<FieldValue>,
}

impl CheckInputs {
    pub fn read(data: &StepData) -> Result<Self, StepInputError> {
        Ok(Self {
            field: data.required_str("field")?.to_string(),
            operator: data.optional_str("operator")?.map(str::to_string),
            expected: data.scalar("expectedValue")?,
        })
    }

    /// A `FieldCheck` over these inputs for one record kind and identifier.
    pub fn check<'a>(
        &'a self,
        kind: &'a str,
        id_field: &'a str,
        identifier: &'a FieldValue,
        policy: MissingFieldPolicy,
    ) -> FieldCheck<'a> {
        FieldCheck::new(kind, id_field, identifier, &self.field)
            .with_operator(self.operator.as_deref())
            .with_expected(self.expected.as_ref())
            .with_missing_field_policy(policy)
    }
}

/// Outcome for inputs that passed registry checks but could not be read.
pub(crate) fn invalid_input(step_id: &str, error: &StepInputError) -> StepResult {
    StepResult::new(input_error_outcome(step_id, error))
}
