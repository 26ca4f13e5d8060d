//! Generic object operations every CRM client provides.

use super::error::ClientError;
use crm_steps_base::types::{FieldValue, Record};
use serde::{Deserialize, Serialize};

/// Identity of a freshly created record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
}

impl CreatedRecord {
    /// Key-value record carrying the new id, as emitted by creation steps.
    pub fn to_record(&self) -> Record {
        Record::new().with_field("Id", self.id.as_str())
    }
}

/// Generic CRUD surface over named CRM objects (`Lead`, `Contact`,
/// `Opportunity`, custom `Foo__c` objects, ...).
///
/// `also_retrieve` names fields the caller will read from the result. An
/// empty list means every field the client knows about.
pub trait ObjectAware: Send + Sync {
    /// Every record of `object` whose `field` equals `value`.
    fn find_objects_by_field(
        &self,
        object: &str,
        field: &str,
        value: &FieldValue,
        also_retrieve: &[&str],
    ) -> Result<Vec<Record>, ClientError>;

    fn create_object(&self, object: &str, fields: Record) -> Result<CreatedRecord, ClientError>;

    fn delete_object_by_id(&self, object: &str, id: &str) -> Result<(), ClientError>;

    /// First record of `object` whose `field` equals `value`.
    fn find_object_by_field(
        &self,
        object: &str,
        field: &str,
        value: &FieldValue,
        also_retrieve: &[&str],
    ) -> Result<Option<Record>, ClientError> {
        Ok(self
            .find_objects_by_field(object, field, value, also_retrieve)?
            .into_iter()
            .next())
    }

    fn find_object_by_id(
        &self,
        object: &str,
        id: &str,
        also_retrieve: &[&str],
    ) -> Result<Option<Record>, ClientError> {
        self.find_object_by_field(object, "Id", &FieldValue::from(id), also_retrieve)
    }
}
