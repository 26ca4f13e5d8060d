//! Log codes and their classification metadata
//!
//! Every coded event carries a `Code`. The registry below maps each code to a
//! category, severity and recommended action.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Configuration error codes
pub mod config {
    use super::Code;

    pub const CONFIG_LOAD_FAILURE: Code = Code::new("E010");
    pub const INVALID_CONFIG_VALUE: Code = Code::new("E011");
}

/// Step registry error codes
pub mod registry {
    use super::Code;

    pub const DUPLICATE_STEP: Code = Code::new("E020");
    pub const INVALID_DEFINITION: Code = Code::new("E021");
    pub const UNKNOWN_STEP: Code = Code::new("E022");
}

/// Step input error codes
pub mod input {
    use super::Code;

    pub const INVALID_STEP_INPUT: Code = Code::new("E030");
}

/// Scenario execution error codes
pub mod scenario {
    use super::Code;

    pub const SCENARIO_LOAD_FAILURE: Code = Code::new("E040");
    pub const STEP_ERRORED: Code = Code::new("E041");
    pub const REPORT_WRITE_FAILURE: Code = Code::new("E042");
}

/// CRM client error codes
pub mod client {
    use super::Code;

    pub const FIXTURE_LOAD_FAILURE: Code = Code::new("E050");
    pub const REQUEST_FAILED: Code = Code::new("E051");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const CONFIG_LOADED: Code = Code::new("I002");
    pub const REGISTRY_READY: Code = Code::new("I010");
    pub const STEP_PASSED: Code = Code::new("I020");
    pub const SCENARIO_COMPLETED: Code = Code::new("I030");
    pub const REPORT_WRITTEN: Code = Code::new("I031");
    pub const RECORD_CREATED: Code = Code::new("I040");
    pub const RECORD_DELETED: Code = Code::new("I041");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        let entries = [
            ("ERR001", "System", Severity::Critical, false,
             "Critical internal error", "File a bug report with the log output"),
            ("ERR002", "System", Severity::Critical, false,
             "Initialization failure", "Check configuration and environment"),
            ("E010", "Configuration", Severity::High, false,
             "Configuration file could not be loaded", "Check the config path and TOML syntax"),
            ("E011", "Configuration", Severity::High, false,
             "Configuration value is invalid", "Use one of the documented values"),
            ("E020", "Registry", Severity::High, false,
             "Step id registered twice", "Give every step a unique id"),
            ("E021", "Registry", Severity::High, false,
             "Step definition failed validation", "Fix the step expression or field list"),
            ("E022", "Registry", Severity::Medium, true,
             "Scenario references an unknown step", "Run `crm-steps steps` to list valid ids"),
            ("E030", "Input", Severity::Medium, true,
             "Step input is missing or has the wrong type", "Supply every required field"),
            ("E040", "Scenario", Severity::High, true,
             "Scenario file could not be loaded", "Check the scenario path and JSON syntax"),
            ("E041", "Scenario", Severity::Medium, true,
             "Step could not be evaluated", "Inspect the step message for the cause"),
            ("E042", "Scenario", Severity::Medium, true,
             "Report could not be written", "Check the output path is writable"),
            ("E050", "Client", Severity::High, false,
             "CRM fixtures could not be loaded", "Check the fixtures path and JSON shape"),
            ("E051", "Client", Severity::Medium, true,
             "CRM request failed", "Check connectivity and credentials"),
            ("I001", "Success", Severity::Low, true, "Logging initialized", ""),
            ("I002", "Success", Severity::Low, true, "Configuration loaded", ""),
            ("I010", "Success", Severity::Low, true, "Step registry ready", ""),
            ("I020", "Success", Severity::Low, true, "Step passed", ""),
            ("I030", "Success", Severity::Low, true, "Scenario completed", ""),
            ("I031", "Success", Severity::Low, true, "Report written", ""),
            ("I040", "Success", Severity::Low, true, "Record created", ""),
            ("I041", "Success", Severity::Low, true, "Record deleted", ""),
        ];

        entries
            .into_iter()
            .map(|(code, category, severity, recoverable, description, recommended_action)| {
                (
                    code,
                    CodeMetadata {
                        code,
                        category,
                        severity,
                        recoverable,
                        description,
                        recommended_action,
                    },
                )
            })
            .collect()
    })
}

pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map(|m| m.severity).unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map(|m| m.recoverable).unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.description).unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.recommended_action)
        .filter(|a| !a.is_empty())
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("General")
}
