//! CCIO field validation. A CCIO record hangs off a Lead and is found by the
//! Lead's Id.

use super::check::{invalid_input, CheckInputs};
use super::log_request_failure;
use crate::client::{CcioAware, ObjectAware};
use crm_steps_base::execution::MissingFieldPolicy;
use crm_steps_base::results::StepResult;
use crm_steps_base::strategies::{Step, StepDefinition};
use crm_steps_base::types::{FieldValue, ScenarioContext, StepData};
use std::sync::Arc;

pub struct CcioFieldEquals {
    definition: StepDefinition,
    client: Arc<dyn ObjectAware>,
    policy: MissingFieldPolicy,
}

impl CcioFieldEquals {
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

impl Step for CcioFieldEquals {
    fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    fn execute(&self, data: &StepData, _context: &ScenarioContext) -> StepResult {
        let read = CheckInputs::read(data)
            .and_then(|inputs| Ok((inputs, data.required_str("id")?.to_string())));
        let (inputs, lead_id) = match read {
            Ok(read) => read,
            Err(e) => return invalid_input(self.step_id(), &e),
        };
        let identifier = FieldValue::from(lead_id.as_str());

        inputs
            .check("CCIO", "Lead Id", &identifier, self.policy)
            .run(|| {
                self.client
                    .find_ccio_by_lead_id(&lead_id, &[inputs.field.as_str()])
                    .inspect_err(|e| log_request_failure(self.step_id(), "CCIO__c", e))
            })
            .outcome
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::create_ccio_field_equals_definition;
    use crate::steps::stub::StubClient;
    use crm_steps_base::execution::ValidationPhase;
    use crm_steps_base::results::OutcomeKind;
    use crm_steps_base::types::Record;
    use serde_json::json;

    fn ccio() -> Record {
        Record::new()
            .with_field("someField", "Expected Value")
            .with_field("numericField", 5000)
    }

    fn step_with(client: StubClient, policy: MissingFieldPolicy) -> CcioFieldEquals {
        CcioFieldEquals::new(create_ccio_field_equals_definition(), Arc::new(client), policy)
    }

    fn run(client: StubClient, data: serde_json::Value) -> StepResult {
        step_with(client, MissingFieldPolicy::Fail)
            .execute(&StepData::from_value(data).unwrap(), &ScenarioContext::standalone())
    }

    #[test]
    fn test_pass_and_lookup_by_lead_id() {
        let client = StubClient::returning(vec![ccio()]);
        let result = run(
            client.clone(),
            json!({ "field": "someField", "expectedValue": "Expected Value", "id": "anything@example.com" }),
        );
        assert_eq!(result.outcome.kind, OutcomeKind::Pass);
        assert_eq!(
            client.calls(),
            vec!["find CCIO__c Lead__c=anything@example.com [someField]"]
        );
    }

    #[test]
    fn test_invalid_operator_is_error() {
        for operator in ["invalid operator", "invalidOperator"] {
            let result = run(
                StubClient::returning(vec![ccio()]),
                json!({ "field": "someField", "expectedValue": "Any Value", "id": "x", "operator": operator }),
            );
            assert_eq!(result.outcome.kind, OutcomeKind::Error);
        }
    }

    #[test]
    fn test_non_numeric_relational_operand_is_error() {
        let result = run(
            StubClient::returning(vec![ccio()]),
            json!({ "field": "numericField", "expectedValue": "nonNumeric", "id": "x", "operator": "be greater than" }),
        );
        assert_eq!(result.outcome.kind, OutcomeKind::Error);
    }

    #[test]
    fn test_unexpected_value_fails() {
        let result = run(
            StubClient::returning(vec![ccio()]),
            json!({ "field": "someField", "expectedValue": "Not Expected Value", "id": "x" }),
        );
        assert_eq!(result.outcome.kind, OutcomeKind::Fail);
    }

    #[test]
    fn test_no_result_fails() {
        let result = run(
            StubClient::returning(vec![]),
            json!({ "field": "anyField", "expectedValue": "Any Value", "id": "x" }),
        );
        assert_eq!(result.outcome.kind, OutcomeKind::Fail);
    }

    #[test]
    fn test_missing_field_follows_policy() {
        let data = json!({ "field": "someOtherField", "expectedValue": "Any Value", "id": "x" });
        let as_fail = run(StubClient::returning(vec![ccio()]), data.clone());
        assert_eq!(as_fail.outcome.kind, OutcomeKind::Fail);

        let as_error = step_with(StubClient::returning(vec![ccio()]), MissingFieldPolicy::Error)
            .execute(&StepData::from_value(data).unwrap(), &ScenarioContext::standalone());
        assert_eq!(as_error.outcome.kind, OutcomeKind::Error);
    }

    #[test]
    fn test_client_error_is_error() {
        let result = run(
            StubClient::failing("Any error"),
            json!({ "field": "someOtherField", "expectedValue": "Any Value", "id": "x" }),
        );
        assert_eq!(result.outcome.kind, OutcomeKind::Error);
    }

    #[test]
    fn test_missing_expected_value_reported_before_lookup() {
        for data in [
            json!({ "field": "anyField", "expectedValue": null, "id": "anyId", "operator": "anyOperator" }),
            json!({ "field": "anyField", "id": "anyId", "operator": "anyOperator" }),
        ] {
            let client = StubClient::returning(vec![ccio()]);
            let result = run(client.clone(), data);
            assert_eq!(result.outcome.kind, OutcomeKind::Error);
            assert_eq!(
                result.outcome.message_template,
                "The operator '%s' requires an expected value. Please provide one."
            );
            assert!(client.calls().is_empty());
        }
    }

    #[test]
    fn test_check_decides_missing_expected_while_idle() {
        let inputs = CheckInputs::read(
            &StepData::default().with("field", "anyField").with("operator", "be"),
        )
        .unwrap();
        let identifier = FieldValue::from("anyId");
        let result = inputs
            .check("CCIO", "Lead Id", &identifier, MissingFieldPolicy::Error)
            .run(|| Ok::<_, String>(Some(ccio())));
        assert_eq!(result.decided_in, ValidationPhase::Idle);
        assert_eq!(result.phase, ValidationPhase::Resolved);
    }
}
