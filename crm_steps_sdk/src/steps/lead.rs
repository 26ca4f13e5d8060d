//! Lead steps

use super::check::{invalid_input, CheckInputs};
use super::log_request_failure;
use crate::client::{LeadAware, ObjectAware};
use crm_steps_base::execution::MissingFieldPolicy;
use crm_steps_base::results::{Outcome, StepRecord, StepResult};
use crm_steps_base::strategies::{Step, StepDefinition};
use crm_steps_base::types::{FieldValue, ScenarioContext, StepData};
use std::sync::Arc;

pub struct LeadFieldEquals {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
    policy: MissingFieldPolicy,
}

impl LeadFieldEquals {
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

impl Step for LeadFieldEquals {
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
            .check("Lead", "email", &identifier, self.policy)
            .run(|| {
                self.client
                    .find_lead_by_email(&email, &[inputs.field.as_str()])
                    .inspect_err(|e| log_request_failure(self.step_id(), "Lead", e))
            })
            .outcome
            .into()
    }
}

pub struct CreateLead {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
}

impl CreateLead {
    pub fn new(definition: StepDefinition, client: Arc<dyn ObjectAware>) -> Self {
        Self { definition, client }
    }
}

impl Step for CreateLead {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, context: &ScenarioContext) -> StepResult {
        let lead = match data.record("lead") {
            Ok(lead) => lead,
            Err(e) => return invalid_input(self.step_id(), &e),
        };

        match self.client.create_lead(lead) {
            Ok(created) => StepResult::new(Outcome::pass(
                "Successfully created Lead with ID %s",
                vec![created.id.as_str().into()],
            ))
            .with_records(StepRecord::created_pair(
                "lead",
                "Lead",
                created.to_record(),
                context.step_order(),
            )),
            Err(e) => {
                log_request_failure(self.step_id(), "Lead", &e);
                Outcome::error(
                    "There was a problem creating the Lead: %s",
                    vec![e.to_string().into()],
                )
                .into()
            }
        }
    }
}

pub struct DeleteLead {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
}

impl DeleteLead {
    pub fn new(definition: StepDefinition, client: Arc<dyn ObjectAware>) -> Self {
        Self { definition, client }
    }
}

impl Step for DeleteLead {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, _context: &ScenarioContext) -> StepResult {
        let email = match data.required_str("email") {
            Ok(email) => email,
            Err(e) => return invalid_input(self.step_id(), &e),
        };

        match self.client.delete_lead_by_email(email) {
            Ok(()) => Outcome::pass("Successfully deleted Lead %s", vec![email.into()]).into(),
            Err(e) => {
                log_request_failure(self.step_id(), "Lead", &e);
                Outcome::error(
                    "There was a problem deleting the Lead %s: %s",
                    vec![email.into(), e.to_string().into()],
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
    use crate::definitions::{
        create_create_lead_definition, create_delete_lead_definition,
        create_lead_field_equals_definition,
    };
    use crate::steps::stub::StubClient;
    use crm_steps_base::results::OutcomeKind;
    use crm_steps_base::types::Record;
    use serde_json::json;

    #[test]
    fn test_create_lead_emits_record_pair() {
        let client = StubClient::returning(vec![]);
        let step = CreateLead::new(create_create_lead_definition(), Arc::new(client.clone()));
        let mut context = ScenarioContext::new("leads");
        context.begin_step();
        context.begin_step();

        let data = StepData::default().with("lead", json!({ "Email": "a@b.co", "LastName": "Smith" }));
        let result = step.execute(&data, &context);

        assert_eq!(result.outcome.kind, OutcomeKind::Pass);
        assert_eq!(result.outcome.render(), "Successfully created Lead with ID NEW0000001");
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].id, "lead");
        assert_eq!(result.records[0].name, "Created Lead");
        assert_eq!(result.records[1].id, "lead.2");
        assert_eq!(result.records[1].name, "Created Lead from Step 2");
        assert_eq!(result.records[1].fields.id().as_deref(), Some("NEW0000001"));
        assert_eq!(client.calls(), vec!["create Lead (2 fields)"]);
    }

    #[test]
    fn test_create_lead_error() {
        let step = CreateLead::new(
            create_create_lead_definition(),
            Arc::new(StubClient::failing("quota exceeded")),
        );
        let data = StepData::default().with("lead", json!({ "Email": "a@b.co" }));
        let result = step.execute(&data, &ScenarioContext::standalone());
        assert_eq!(result.outcome.kind, OutcomeKind::Error);
        assert!(result.records.is_empty());
        assert_eq!(
            result.outcome.message_template,
            "There was a problem creating the Lead: %s"
        );
    }

    #[test]
    fn test_lead_field_equals_against_memory_crm() {
        let crm = InMemoryCrm::new().with_record(
            "Lead",
            Record::new()
                .with_field("Id", "00Q1")
                .with_field("Email", "a@b.co")
                .with_field("Company", "Acme Corp"),
        );
        let step = LeadFieldEquals::new(
            create_lead_field_equals_definition(),
            Arc::new(crm),
            MissingFieldPolicy::Error,
        );
        let data = StepData::default()
            .with("email", "a@b.co")
            .with("field", "Company")
            .with("operator", "contain")
            .with("expectedValue", "Acme");

        let result = step.execute(&data, &ScenarioContext::standalone());
        assert_eq!(result.outcome.kind, OutcomeKind::Pass);
    }

    #[test]
    fn test_delete_missing_lead_is_error() {
        let crm = Arc::new(InMemoryCrm::new());
        let step = DeleteLead::new(create_delete_lead_definition(), crm);
        let data = StepData::default().with("email", "nobody@example.com");

        let result = step.execute(&data, &ScenarioContext::standalone());
        assert_eq!(result.outcome.kind, OutcomeKind::Error);
        assert_eq!(
            result.outcome.render(),
            "There was a problem deleting the Lead nobody@example.com: No Lead found with email nobody@example.com"
        );
    }
}
