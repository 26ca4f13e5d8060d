//! # Salesforce Steps
//!
//! Validation steps look one record up and compare a field:
//! - OpportunityFieldEquals: Opportunity found by any identifying field
//! - LeadFieldEquals / ContactFieldEquals: found by email
//! - ObjectFieldEquals: any object type, found by Id
//! - CcioFieldEquals: CCIO record attached to a Lead
//!
//! Action steps create or delete records. Creation steps emit the new Id as
//! both a plain and a step-ordered record.

mod check;
pub mod ccio;
pub mod contact;
pub mod lead;
pub mod object;
pub mod opportunity;

pub use ccio::CcioFieldEquals;
pub use contact::{ContactFieldEquals, CreateContact, DeleteContact};
pub use lead::{CreateLead, DeleteLead, LeadFieldEquals};
pub use object::{CreateObject, ObjectFieldEquals};
pub use opportunity::OpportunityFieldEquals;

use crate::client::ClientError;
use crm_steps_base::logging::codes;
use crm_steps_base::log_error;

/// Record a CRM call that failed while a step ran.
pub(crate) fn log_request_failure(step_id: &str, object: &str, error: &ClientError) {
    log_error!(codes::client::REQUEST_FAILED, "CRM request failed",
        "step_id" => step_id,
        "object" => object,
        "error" => error
    );
}
