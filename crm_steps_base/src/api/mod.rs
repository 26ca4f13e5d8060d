//! # Public API for CRM steps
//!
//! Configuration, scenario files and the runner that executes them.

pub mod config;
pub mod runner;
pub mod scenario;

pub use config::{ConfigError, RunnerConfig};
pub use runner::{RunnerError, ScenarioRunner, UNKNOWN_STEP_TEMPLATE};
pub use scenario::{Scenario, ScenarioError, ScenarioStep};
