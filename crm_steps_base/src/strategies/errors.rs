// src/strategies/errors.rs
//! Error types for the step registry and definition validation

/// Step definition validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Step definition has an empty step id")]
    EmptyStepId,

    #[error("Expression for step '{step_id}' is not a valid pattern: {reason}")]
    InvalidExpression { step_id: String, reason: String },

    #[error("Capture group '{group}' in step '{step_id}' has no matching field definition")]
    UndeclaredCaptureGroup { step_id: String, group: String },

    #[error("Required field '{field}' of step '{step_id}' is not captured by its expression")]
    RequiredFieldNotCaptured { step_id: String, field: String },

    #[error("Operator token '{token}' in step '{step_id}' is not a registered operator")]
    UnknownOperatorToken { step_id: String, token: String },

    #[error("Field '{field}' is declared more than once in step '{step_id}'")]
    DuplicateField { step_id: String, field: String },
}

/// Step registry and management errors
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    #[error("Step '{step_id}' is already registered")]
    DuplicateStep { step_id: String },

    #[error("Step definition error: {0}")]
    DefinitionError(#[from] DefinitionError),

    #[error("Step registration failed for '{step_id}': {reason}")]
    RegistrationFailed { step_id: String, reason: String },
}
