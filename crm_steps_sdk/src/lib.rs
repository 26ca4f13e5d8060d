//! # CRM Steps SDK
//!
//! Salesforce steps built on `crm_steps_base`: the CRM client boundary,
//! step definitions, concrete validation and action steps, and a registry
//! factory wiring them to one client.

pub mod client;
pub mod definitions;
pub mod steps;

use client::ObjectAware;
use crm_steps_base::api::RunnerConfig;
use crm_steps_base::strategies::{StepRegistry, StrategyError};
use std::sync::Arc;

/// Create a registry with every Salesforce step bound to `client`
///
/// Includes:
/// - Field validation on Opportunities, Leads, Contacts, CCIOs and any object by Id
/// - Lead, Contact and generic object creation
/// - Lead and Contact deletion by email
///
/// Validation steps apply `config.missing_field_policy`.
pub fn create_step_registry(
    client: Arc<dyn ObjectAware>,
    config: &RunnerConfig,
) -> Result<StepRegistry, StrategyError> {
    let policy = config.missing_field_policy;
    let mut registry = StepRegistry::new();

    registry.register(Box::new(steps::OpportunityFieldEquals::new(
        definitions::create_opportunity_field_equals_definition(),
        client.clone(),
        policy,
    )))?;
    registry.register(Box::new(steps::LeadFieldEquals::new(
        definitions::create_lead_field_equals_definition(),
        client.clone(),
        policy,
    )))?;
    registry.register(Box::new(steps::ContactFieldEquals::new(
        definitions::create_contact_field_equals_definition(),
        client.clone(),
        policy,
    )))?;
    registry.register(Box::new(steps::ObjectFieldEquals::new(
        definitions::create_object_field_equals_definition(),
        client.clone(),
        policy,
    )))?;
    registry.register(Box::new(steps::CcioFieldEquals::new(
        definitions::create_ccio_field_equals_definition(),
        client.clone(),
        policy,
    )))?;

    registry.register(Box::new(steps::CreateLead::new(
        definitions::create_create_lead_definition(),
        client.clone(),
    )))?;
    registry.register(Box::new(steps::CreateContact::new(
        definitions::create_create_contact_definition(),
        client.clone(),
    )))?;
    registry.register(Box::new(steps::CreateObject::new(
        definitions::create_create_object_definition(),
        client.clone(),
    )))?;
    registry.register(Box::new(steps::DeleteLead::new(
        definitions::create_delete_lead_definition(),
        client.clone(),
    )))?;
    registry.register(Box::new(steps::DeleteContact::new(
        definitions::create_delete_contact_definition(),
        client,
    )))?;

    Ok(registry)
}
