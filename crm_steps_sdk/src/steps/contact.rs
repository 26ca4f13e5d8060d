//! Contact steps

use super::check::{invalid_input, CheckInputs};
use super::log_request_failure;
use crate::client::{ContactAware, ObjectAware};
use crm_steps_base::execution::MissingFieldPolicy;
use crm_steps_base::results::{Outcome, StepRecord, StepResult};
use crm_steps_base::strategies::{Step, StepDefinition};
use crm_steps_base::types::{FieldValue, ScenarioContext, StepData};
use std::sync::Arc;

pub struct ContactFieldEquals {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
    policy: MissingFieldPolicy,
}

impl ContactFieldEquals {
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

impl Step for ContactFieldEquals {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, _context: &ScenarioContext) -> StepResult {
        let read = CheckInputs::read(data)
            .and_then(|inputs| Ok((inputs, data.required_str("email")?.to_string())));
        let (inputs, email) = match read {
            Ok(read) => read,
            Err(e) => return invalid_input(self.step_id(), &e),
        };
        let identifier = FieldValue::from(email.as_str());

        inputs
            .check("Contact", "email", &identifier, self.policy)
            .run(|| {
                self.client
                    .find_contact_by_email(&email, &[inputs.field.as_str()])
                    .inspect_err(|e| log_request_failure(self.step_id(), "Contact", e))
            })
            .outcome
            .into()
    }
}

pub struct CreateContact {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
}

impl CreateContact {
    pub fn new(definition: StepDefinition, client: Arc<dyn ObjectAware>) -> Self {
        Self { definition, client }
    }
}

impl Step for CreateContact {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, context: &ScenarioContext) -> StepResult {
        let contact = match data.record("contact") {
            Ok(contact) => contact,
            Err(e) => return invalid_input(self.step_id(), &e),
        };

        match self.client.create_contact(contact) {
            Ok(created) => StepResult::new(Outcome::pass(
                "Successfully created Contact with ID %s",
                vec![created.id.as_str().into()],
            ))
            .with_records(StepRecord::created_pair(
                "contact",
                "Contact",
                created.to_record(),
                context.step_order(),
            )),
            Err(e) => {
                log_request_failure(self.step_id(), "Contact", &e);
                Outcome::error(
                    "There was a problem creating the Contact: %s",
                    vec![e.to_string().into()],
                )
                .into()
            }
        }
    }
}

pub struct DeleteContact {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
}

impl DeleteContact {
    pub fn new(definition: StepDefinition, client: Arc<dyn ObjectAware>) -> Self {
        Self { definition, client }
    }
}

impl Step for DeleteContact {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, _context: &ScenarioContext) -> StepResult {
        let email = match data.required_str("email") {
            Ok(email) => email,
            Err(e) => return invalid_input(self.step_id(), &e),
        };

        match self.client.delete_contact_by_email(email) {
            Ok(()) => Outcome::pass("Successfully deleted Contact %s", vec![email.into()]).into(),
            Err(e) => {
                log_request_failure(self.step_id(), "Contact", &e);
                Outcome::error(
                    "There was a problem deleting the Contact %s: %s",
                    vec![email.into(), e.to_string().into()],
                )
                .into()
            }
        }
    }
}
