//! Steps over arbitrary Salesforce objects, named at run time.

use super::check::{invalid_input, CheckInputs};
use super::log_request_failure;
use crate::client::ObjectAware;
use crm_steps_base::execution::MissingFieldPolicy;
use crm_steps_base::results::{Outcome, StepRecord, StepResult};
use crm_steps_base::strategies::{Step, StepDefinition};
use crm_steps_base::types::{FieldValue, ScenarioContext, StepData};
use std::sync::Arc;

pub struct ObjectFieldEquals {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
    policy: MissingFieldPolicy,
}

impl ObjectFieldEquals {
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

impl Step for ObjectFieldEquals {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, _context: &ScenarioContext) -> StepResult {
        let read = CheckInputs::read(data).and_then(|inputs| {
            let object = data.required_str("objName")?.to_string();
            let id = data.required_str("id")?.to_string();
            Ok((inputs, object, id))
        });
        let (inputs, object, id) = match read {
            Ok(read) => read,
            Err(e) => return invalid_input(self.step_id(), &e),
        };
        let identifier = FieldValue::from(id.as_str());

        inputs
            .check(&object, "Id", &identifier, self.policy)
            .run(|| {
                self.client
                    .find_object_by_id(&object, &id, &[inputs.field.as_str()])
                    .inspect_err(|e| log_request_failure(self.step_id(), &object, e))
            })
            .outcome
            .into()
    }
}

pub struct CreateObject {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
}

impl CreateObject {
    pub fn new(definition: StepDefinition, client: Arc<dyn ObjectAware>) -> Self {
        Self { definition, client }
    }
}

impl Step for CreateObject {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, context: &ScenarioContext) -> StepResult {
        let read = data
            .required_str("objName")
            .and_then(|object| Ok((object, data.record("salesforceObject")?)));
        let (object, fields) = match read {
            Ok(read) => read,
            Err(e) => return invalid_input(self.step_id(), &e),
        };

        match self.client.create_object(object, fields) {
            Ok(created) => StepResult::new(Outcome::pass(
                "Successfully created %s Object with ID %s",
                vec![object.into(), created.id.as_str().into()],
            ))
            .with_records(StepRecord::created_pair(
                "salesforceObject",
                "Object",
                created.to_record(),
                context.step_order(),
            )),
            Err(e) => {
                log_request_failure(self.step_id(), object, &e);
                Outcome::error(
                    "There was a problem creating the %s Object: %s",
                    vec![object.into(), e.to_string().into()],
                )
                .into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryCrm;
    use crate::definitions::{create_create_object_definition, create_object_field_equals_definition};
    use crm_steps_base::results::OutcomeKind;
    use serde_json::json;

    #[test]
    fn test_create_then_check_custom_object() {
        let crm = Arc::new(InMemoryCrm::new());
        let create = CreateObject::new(create_create_object_definition(), crm.clone());
        let check = ObjectFieldEquals::new(
            create_object_field_equals_definition(),
            crm.clone(),
            MissingFieldPolicy::Error,
        );

        let created = create.execute(
            &StepData::default()
                .with("objName", "Invoice__c")
                .with("salesforceObject", json!({ "Total__c": 120.5 })),
            &ScenarioContext::standalone(),
        );
        assert_eq!(created.outcome.kind, OutcomeKind::Pass);
        assert_eq!(created.records[1].id, "salesforceObject.1");
        let id = created.records[0].fields.id().unwrap();

        let data = StepData::default()
            .with("objName", "Invoice__c")
            .with("id", id.as_str())
            .with("field", "Total__c")
            .with("operator", "be less than")
            .with("expectedValue", 200);
        let result = check.execute(&data, &ScenarioContext::standalone());
        assert_eq!(result.outcome.kind, OutcomeKind::Pass);
    }

    #[test]
    fn test_unknown_id_fails() {
        let check = ObjectFieldEquals::new(
            create_object_field_equals_definition(),
            Arc::new(InMemoryCrm::new()),
            MissingFieldPolicy::Error,
        );
        let data = StepData::default()
            .with("objName", "Invoice__c")
            .with("id", "a00missing")
            .with("field", "Total__c")
            .with("expectedValue", "1");

        let result = check.execute(&data, &ScenarioContext::standalone());
        assert_eq!(result.outcome.kind, OutcomeKind::Fail);
        assert_eq!(result.outcome.render(), "No Invoice__c matches Id a00missing");
    }
}
