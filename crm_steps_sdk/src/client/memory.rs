//! # Fixture-backed CRM
//!
//! Keeps records per object name in memory. Fixture files map object names to
//! arrays of records:
//!
//! ```json
//! {
//!   "Lead": [{ "Id": "00Q1", "Email": "a@b.co", "LastName": "Smith" }],
//!   "Opportunity": [{ "Id": "0061", "Name": "Renewal", "Amount": 5000 }]
//! }
//! ```

use super::error::ClientError;
use super::object_aware::{CreatedRecord, ObjectAware};
use crm_steps_base::execution::evaluate_operator;
use crm_steps_base::logging::codes;
use crm_steps_base::types::{FieldValue, Operator, Record};
use crm_steps_base::{log_debug, log_success};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const GENERATED_ID_LEN: usize = 18;

#[derive(Debug, Default)]
pub struct InMemoryCrm {
    objects: RwLock<BTreeMap<String, Vec<Record>>>,
}

impl InMemoryCrm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path).map_err(|source| ClientError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ClientError::FixtureFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_json(&value).map_err(|reason| ClientError::FixtureFormat {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Build from `{ "<Object>": [ { field: value, ... }, ... ], ... }`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, String> {
        let objects = value
            .as_object()
            .ok_or_else(|| "top level must be an object keyed by object name".to_string())?;

        let mut store = BTreeMap::new();
        for (object, records) in objects {
            let records = records
                .as_array()
                .ok_or_else(|| format!("'{}' must be an array of records", object))?;
            let parsed = records
                .iter()
                .enumerate()
                .map(|(index, record)| {
                    Record::from_json(record)
                        .ok_or_else(|| format!("'{}[{}]' must be an object", object, index))
                })
                .collect::<Result<Vec<_>, _>>()?;
            store.insert(object.clone(), parsed);
        }

        Ok(Self {
            objects: RwLock::new(store),
        })
    }

    pub fn with_record(self, object: &str, record: Record) -> Self {
        self.write().entry(object.to_string()).or_default().push(record);
        self
    }

    pub fn count(&self, object: &str) -> usize {
        self.read().get(object).map_or(0, Vec::len)
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Vec<Record>>> {
        self.objects.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Vec<Record>>> {
        self.objects.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn field_matches(record: &Record, field: &str, value: &FieldValue) -> bool {
    evaluate_operator(Operator::Be, record.get(field), Some(value)).unwrap_or(false)
}

fn retrieve(record: &Record, field: &str, also_retrieve: &[&str]) -> Record {
    if also_retrieve.is_empty() {
        return record.clone();
    }
    let names = ["Id", field].into_iter().chain(also_retrieve.iter().copied());
    record.project(names)
}

fn generate_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(GENERATED_ID_LEN);
    id
}

impl ObjectAware for InMemoryCrm {
    fn find_objects_by_field(
        &self,
        object: &str,
        field: &str,
        value: &FieldValue,
        also_retrieve: &[&str],
    ) -> Result<Vec<Record>, ClientError> {
        let found: Vec<Record> = self
            .read()
            .get(object)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| field_matches(record, field, value))
                    .map(|record| retrieve(record, field, also_retrieve))
                    .collect()
            })
            .unwrap_or_default();

        log_debug!("Object lookup",
            "object" => object,
            "field" => field,
            "value" => value,
            "matches" => found.len()
        );
        Ok(found)
    }

    fn create_object(&self, object: &str, fields: Record) -> Result<CreatedRecord, ClientError> {
        if fields.has_field("Id") {
            return Err(ClientError::InvalidRecord {
                object: object.to_string(),
                reason: "Id is assigned by the CRM and cannot be supplied".to_string(),
            });
        }

        let id = generate_id();
        let mut record: BTreeMap<String, FieldValue> = fields.into_fields();
        record.insert("Id".to_string(), FieldValue::from(id.as_str()));
        self.write()
            .entry(object.to_string())
            .or_default()
            .push(record.into_iter().collect());

        log_success!(codes::success::RECORD_CREATED, "Record created",
            "object" => object,
            "id" => id
        );
        Ok(CreatedRecord { id })
    }

    fn delete_object_by_id(&self, object: &str, id: &str) -> Result<(), ClientError> {
        let mut objects = self.write();
        let records = objects
            .get_mut(object)
            .ok_or_else(|| ClientError::not_found(object, format!("Id {}", id)))?;
        let before = records.len();
        records.retain(|record| record.id().as_deref() != Some(id));
        if records.len() == before {
            return Err(ClientError::not_found(object, format!("Id {}", id)));
        }
        drop(objects);

        log_success!(codes::success::RECORD_DELETED, "Record deleted",
            "object" => object,
            "id" => id
        );
        Ok(())
    }
}
