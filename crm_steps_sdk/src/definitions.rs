//! # Step Definitions
//!
//! Static contracts for every Salesforce step: id, name, the expression that
//! matches it, expected inputs and the records it may emit.

use crm_steps_base::strategies::{
    operator_clause, operator_fields, FieldDefinition, FieldType, RecordDefinition,
    StepDefinition, StepType,
};

/// Expression of the CCIO check. Kept verbatim so existing scenarios keep matching.
pub const CCIO_FIELD_EQUALS_EXPRESSION: &str = "the (?<field>[a-zA-Z0-9_]+) field on a ccio object associated with salesforce lead with id (?<id>.+) should (?<operator>be set|not be set|be less than|be greater than|be one of|be|contain|not be one of|not be|not contain) ?(?<expectedValue>.+)?";

fn field_to_check() -> FieldDefinition {
    FieldDefinition::required("field", FieldType::String, "The name of the field to check")
}

fn with_operator_fields(definition: StepDefinition) -> StepDefinition {
    operator_fields()
        .into_iter()
        .fold(definition, StepDefinition::with_field)
}

fn created_record(id: &str, description: &str) -> RecordDefinition {
    RecordDefinition::key_value(
        id,
        vec![FieldDefinition::required("Id", FieldType::String, description)],
    )
}

// ============================================================================
// Validation steps
// ============================================================================

pub fn create_opportunity_field_equals_definition() -> StepDefinition {
    let expression = format!(
        "the (?<field>[a-zA-Z0-9_]+) field on salesforce opportunity with (?<idField>[a-zA-Z0-9_]+) (?<identifier>.+) {}",
        operator_clause()
    );
    let definition = StepDefinition::new(
        "OpportunityFieldEquals",
        "Check a field on a Salesforce Opportunity",
        expression,
        StepType::Validation,
    )
    .with_field(FieldDefinition::required(
        "idField",
        FieldType::String,
        "The field used to search/identify the opportunity",
    ))
    .with_field(FieldDefinition::required(
        "identifier",
        FieldType::AnyScalar,
        "The value of the id field to use when searching",
    ))
    .with_field(field_to_check());
    with_operator_fields(definition)
}

pub fn create_lead_field_equals_definition() -> StepDefinition {
    let expression = format!(
        "the (?<field>[a-zA-Z0-9_]+) field on salesforce lead (?<email>.+) {}",
        operator_clause()
    );
    let definition = StepDefinition::new(
        "LeadFieldEquals",
        "Check a field on a Salesforce Lead",
        expression,
        StepType::Validation,
    )
    .with_field(FieldDefinition::required(
        "email",
        FieldType::Email,
        "The email address of the Lead",
    ))
    .with_field(field_to_check());
    with_operator_fields(definition)
}

pub fn create_contact_field_equals_definition() -> StepDefinition {
    let expression = format!(
        "the (?<field>[a-zA-Z0-9_]+) field on salesforce contact (?<email>.+) {}",
        operator_clause()
    );
    let definition = StepDefinition::new(
        "ContactFieldEquals",
        "Check a field on a Salesforce Contact",
        expression,
        StepType::Validation,
    )
    .with_field(FieldDefinition::required(
        "email",
        FieldType::Email,
        "The email address of the Contact",
    ))
    .with_field(field_to_check());
    with_operator_fields(definition)
}

pub fn create_object_field_equals_definition() -> StepDefinition {
    let expression = format!(
        "the (?<field>[a-zA-Z0-9_]+) field on salesforce (?<objName>[a-zA-Z0-9_]+) object with id (?<id>.+) {}",
        operator_clause()
    );
    let definition = StepDefinition::new(
        "ObjectFieldEquals",
        "Check a field on a Salesforce Object",
        expression,
        StepType::Validation,
    )
    .with_field(FieldDefinition::required(
        "objName",
        FieldType::String,
        "Salesforce object name",
    ))
    .with_field(FieldDefinition::required(
        "id",
        FieldType::String,
        "The Id of the object to check",
    ))
    .with_field(field_to_check());
    with_operator_fields(definition)
}

pub fn create_ccio_field_equals_definition() -> StepDefinition {
    let definition = StepDefinition::new(
        "CCIOFieldEquals",
        "Check a field on a Salesforce CCIO",
        CCIO_FIELD_EQUALS_EXPRESSION,
        StepType::Validation,
    )
    .with_field(field_to_check())
    .with_field(FieldDefinition::required(
        "id",
        FieldType::String,
        "The Id of the Lead the CCIO is associated with",
    ));
    with_operator_fields(definition)
}

// ============================================================================
// Action steps
// ============================================================================

pub fn create_create_lead_definition() -> StepDefinition {
    StepDefinition::new(
        "CreateLead",
        "Create a Salesforce Lead",
        "create a salesforce lead",
        StepType::Action,
    )
    .with_field(FieldDefinition::required(
        "lead",
        FieldType::Map,
        "A map of field names to field values",
    ))
    .with_record(created_record("lead", "Lead's SalesForce ID"))
}

pub fn create_create_contact_definition() -> StepDefinition {
    StepDefinition::new(
        "CreateContact",
        "Create a Salesforce Contact",
        "create a salesforce contact",
        StepType::Action,
    )
    .with_field(FieldDefinition::required(
        "contact",
        FieldType::Map,
        "A map of field names to field values",
    ))
    .with_record(created_record("contact", "Contact's SalesForce ID"))
}

pub fn create_create_object_definition() -> StepDefinition {
    StepDefinition::new(
        "CreateObject",
        "Create a Salesforce Object",
        "create a salesforce (?<objName>[a-zA-Z0-9]+) object",
        StepType::Action,
    )
    .with_field(FieldDefinition::required(
        "objName",
        FieldType::String,
        "Salesforce object name",
    ))
    .with_field(FieldDefinition::required(
        "salesforceObject",
        FieldType::Map,
        "where keys represent object field names as represented in the SFDC API",
    ))
    .with_record(created_record("salesforceObject", "Object's SalesForce ID"))
}

pub fn create_delete_lead_definition() -> StepDefinition {
    StepDefinition::new(
        "DeleteLead",
        "Delete a Salesforce Lead",
        "delete the (?<email>.+) salesforce lead",
        StepType::Action,
    )
    .with_field(FieldDefinition::required(
        "email",
        FieldType::Email,
        "Lead's email address",
    ))
}

pub fn create_delete_contact_definition() -> StepDefinition {
    StepDefinition::new(
        "DeleteContact",
        "Delete a Salesforce Contact",
        "delete the (?<email>.+) salesforce contact",
        StepType::Action,
    )
    .with_field(FieldDefinition::required(
        "email",
        FieldType::Email,
        "Contact's email address",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_steps_base::strategies::{validate_definition, Optionality};

    fn all() -> Vec<StepDefinition> {
        vec![
            create_opportunity_field_equals_definition(),
            create_lead_field_equals_definition(),
            create_contact_field_equals_definition(),
            create_object_field_equals_definition(),
            create_ccio_field_equals_definition(),
            create_create_lead_definition(),
            create_create_contact_definition(),
            create_create_object_definition(),
            create_delete_lead_definition(),
            create_delete_contact_definition(),
        ]
    }

    #[test]
    fn test_every_definition_validates() {
        for definition in all() {
            assert!(
                validate_definition(&definition).is_ok(),
                "{} failed validation: {:?}",
                definition.step_id,
                validate_definition(&definition)
            );
        }
    }

    #[test]
    fn test_ccio_fields() {
        let definition = create_ccio_field_equals_definition();
        assert_eq!(definition.step_id, "CCIOFieldEquals");
        assert_eq!(definition.expression, CCIO_FIELD_EQUALS_EXPRESSION);

        let field = definition.field("field").unwrap();
        assert_eq!(field.optionality, Optionality::Required);
        assert_eq!(field.field_type, FieldType::String);

        let id = definition.field("id").unwrap();
        assert_eq!(id.optionality, Optionality::Required);

        let expected = definition.field("expectedValue").unwrap();
        assert_eq!(expected.optionality, Optionality::Optional);
        assert_eq!(expected.field_type, FieldType::AnyScalar);
    }

    #[test]
    fn test_create_steps_declare_records() {
        let definition = create_create_object_definition();
        assert_eq!(definition.expected_records[0].id, "salesforceObject");
        assert!(!definition.expected_records[0].dynamic_fields);
    }
}
