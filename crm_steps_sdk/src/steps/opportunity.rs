//! Opportunity field validation

use super::check::{invalid_input, CheckInputs};
use super::log_request_failure;
use crate::client::{ObjectAware, OpportunityAware};
use crm_steps_base::execution::MissingFieldPolicy;
use crm_steps_base::results::StepResult;
use crm_steps_base::strategies::{Step, StepDefinition};
use crm_steps_base::types::{ScenarioContext, StepData};
use std::sync::Arc;

pub struct OpportunityFieldEquals {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
    policy: MissingFieldPolicy,
}

impl OpportunityFieldEquals {
    pub fn new(
        definition: StepDefinition,
        client: Arc<dyn ObjectAware>,
        policy: MissingFieldPolicy,
    ) -> Self {
        Self {
            definition,
            client,
            policy,
        }
    }
}

impl Step for OpportunityFieldEquals {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, _context: &ScenarioContext) -> StepResult {
        let read = CheckInputs::read(data).and_then(|inputs| {
            let id_field = data.required_str("idField")?.to_string();
            let identifier = data.required_scalar("identifier")?;
            Ok((inputs, id_field, identifier))
        });
        let (inputs, id_field, identifier) = match read {
            Ok(read) => read,
            Err(e) => return invalid_input(self.step_id(), &e),
        };

        inputs
            .check("Opportunity", &id_field, &identifier, self.policy)
            .run(|| {
                self.client
                    .find_opportunity_by_identifier(&id_field, &identifier, &inputs.field)
                    .inspect_err(|e| log_request_failure(self.step_id(), "Opportunity", e))
            })
            .outcome
            .into()
    }
}
