//! Per-scenario execution context handed to every step invocation.

use crate::results::StepRecord;

/// Position of the current step and the records produced so far.
///
/// The runner owns one context per scenario and advances it before each step;
/// steps only read it.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    scenario: String,
    step_order: usize,
    records: Vec<StepRecord>,
}

impl ScenarioContext {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            step_order: 0,
            records: Vec::new(),
        }
    }

    /// Context for a step executed outside any scenario. Reports order 1.
    pub fn standalone() -> Self {
        Self {
            scenario: String::from("standalone"),
            step_order: 1,
            records: Vec::new(),
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// 1-based order of the step currently executing.
    pub fn step_order(&self) -> usize {
        self.step_order
    }

    /// Move to the next step and return its order.
    pub fn begin_step(&mut self) -> usize {
        self.step_order += 1;
        self.step_order
    }

    pub fn add_records(&mut self, records: impl IntoIterator<Item = StepRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }
}
