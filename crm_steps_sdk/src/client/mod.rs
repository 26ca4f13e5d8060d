//! # CRM Client Boundary
//!
//! Steps reach the CRM only through [`ObjectAware`]. The per-object helpers
//! (`LeadAware`, `ContactAware`, ...) are blanket extensions over it, so any
//! client implementing the generic object operations gets them for free.

pub mod error;
pub mod memory;
pub mod mixins;
pub mod object_aware;

pub use error::ClientError;
pub use memory::InMemoryCrm;
pub use mixins::{CcioAware, ContactAware, LeadAware, OpportunityAware};
pub use object_aware::{CreatedRecord, ObjectAware};
