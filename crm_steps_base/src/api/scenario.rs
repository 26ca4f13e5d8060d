//! # Scenario files
//!
//! A scenario is a JSON document listing step invocations in order:
//!
//! ```json
//! {
//!   "name": "Lead lifecycle",
//!   "steps": [
//!     { "stepId": "CreateLead", "data": { "lead": { "Email": "a@b.co" } } },
//!     { "stepId": "LeadFieldEquals",
//!       "data": { "email": "a@b.co", "field": "Email", "expectedValue": "a@b.co" } }
//!   ]
//! }
//! ```

use crate::types::StepData;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Scenario '{name}' has no steps")]
    Empty { name: String },
}

/// One step invocation inside a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    #[serde(rename = "stepId")]
    pub step_id: String,
    #[serde(default)]
    pub data: StepData,
}

impl ScenarioStep {
    pub fn new(step_id: impl Into<String>, data: StepData) -> Self {
        Self {
            step_id: step_id.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step_id: impl Into<String>, data: StepData) -> Self {
        self.steps.push(ScenarioStep::new(step_id, data));
        self
    }

    /// Load a scenario file. An unnamed scenario takes the file stem as its name.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scenario: Scenario =
            serde_json::from_str(&content).map_err(|source| ScenarioError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if scenario.name.trim().is_empty() {
            scenario.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
        }
        scenario.ensure_not_empty()?;
        Ok(scenario)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario =
            serde_json::from_str(json).map_err(|source| ScenarioError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        scenario.ensure_not_empty()?;
        Ok(scenario)
    }

    fn ensure_not_empty(&self) -> Result<(), ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::Empty {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}
