//! # Step Results Module
//!
//! Outcomes returned by steps and the reports built from a scenario run.
//!
//! ## Core Types
//! - [`Outcome`] - Pass / Fail / Error with an unrendered message template
//! - [`StepRecord`] - Named snapshot emitted by creation steps
//! - [`ScenarioReport`] - Serializable result of one scenario run
//! - [`ReportError`] - Errors raised while persisting reports
//!
//! ## Usage
//! ```rust
//! use crm_steps_base::results::Outcome;
//!
//! let outcome = Outcome::pass("The %s field was set to %s, as expected.", vec![
//!     "Status".into(),
//!     "Open".into(),
//! ]);
//! assert_eq!(outcome.render(), "The Status field was set to Open, as expected.");
//! ```

pub mod error;
pub mod generator;
pub mod types;

pub use error::*;
pub use generator::ReportBuilder;
pub use types::*;
