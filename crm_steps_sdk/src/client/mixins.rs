//! Per-object helpers layered over [`ObjectAware`].

use super::error::ClientError;
use super::object_aware::{CreatedRecord, ObjectAware};
use crm_steps_base::types::{FieldValue, Record};

pub const LEAD: &str = "Lead";
pub const CONTACT: &str = "Contact";
pub const OPPORTUNITY: &str = "Opportunity";
pub const CCIO: &str = "CCIO__c";
/// Lookup field on a CCIO record pointing at its Lead.
pub const CCIO_LEAD_FIELD: &str = "Lead__c";

fn delete_by_email<C: ObjectAware + ?Sized>(
    client: &C,
    object: &str,
    email: &str,
) -> Result<(), ClientError> {
    let found = client.find_object_by_field(object, "Email", &FieldValue::from(email), &["Id"])?;
    let id = found
        .as_ref()
        .and_then(Record::id)
        .ok_or_else(|| ClientError::not_found(object, format!("email {}", email)))?;
    client.delete_object_by_id(object, &id)
}

pub trait LeadAware: ObjectAware {
    fn create_lead(&self, lead: Record) -> Result<CreatedRecord, ClientError> {
        self.create_object(LEAD, lead)
    }

    fn find_lead_by_email(
        &self,
        email: &str,
        also_retrieve: &[&str],
    ) -> Result<Option<Record>, ClientError> {
        self.find_object_by_field(LEAD, "Email", &FieldValue::from(email), also_retrieve)
    }

    /// Delete the Lead with this email. No match is an error.
    fn delete_lead_by_email(&self, email: &str) -> Result<(), ClientError> {
        delete_by_email(self, LEAD, email)
    }
}

pub trait ContactAware: ObjectAware {
    fn create_contact(&self, contact: Record) -> Result<CreatedRecord, ClientError> {
        self.create_object(CONTACT, contact)
    }

    fn find_contact_by_email(
        &self,
        email: &str,
        also_retrieve: &[&str],
    ) -> Result<Option<Record>, ClientError> {
        self.find_object_by_field(CONTACT, "Email", &FieldValue::from(email), also_retrieve)
    }

    /// Delete the Contact with this email. No match is an error.
    fn delete_contact_by_email(&self, email: &str) -> Result<(), ClientError> {
        delete_by_email(self, CONTACT, email)
    }
}

pub trait OpportunityAware: ObjectAware {
    /// All Opportunities where `id_field` equals `identifier`, with `field` retrieved.
    fn find_opportunity_by_identifier(
        &self,
        id_field: &str,
        identifier: &FieldValue,
        field: &str,
    ) -> Result<Vec<Record>, ClientError> {
        self.find_objects_by_field(OPPORTUNITY, id_field, identifier, &[field])
    }
}

pub trait CcioAware: ObjectAware {
    /// The CCIO record attached to the Lead with `lead_id`.
    fn find_ccio_by_lead_id(
        &self,
        lead_id: &str,
        also_retrieve: &[&str],
    ) -> Result<Option<Record>, ClientError> {
        self.find_object_by_field(CCIO, CCIO_LEAD_FIELD, &FieldValue::from(lead_id), also_retrieve)
    }
}

impl<T: ObjectAware + ?Sized> LeadAware for T {}
impl<T: ObjectAware + ?Sized> ContactAware for T {}
impl<T: ObjectAware + ?Sized> OpportunityAware for T {}
impl<T: ObjectAware + ?Sized> CcioAware for T {}
