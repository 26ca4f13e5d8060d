pub mod common;
pub mod error;
pub mod operators;
pub mod scenario_context;
pub mod step_data;

pub use common::{FieldValue, Record};
pub use error::StepInputError;
pub use operators::{Operator, OperatorClass};
pub use scenario_context::ScenarioContext;
pub use step_data::StepData;
