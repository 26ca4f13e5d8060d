//! Assembles a `ScenarioReport` while a scenario runs.

use super::types::{
    HostContext, RunMetadata, RunSummary, ScenarioReport, StepReport, StepResult, StepStatus,
};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Collects step reports and produces the final scenario report.
pub struct ReportBuilder {
    run_id: String,
    scenario: String,
    started_at: DateTime<Utc>,
    steps: Vec<StepReport>,
}

impl ReportBuilder {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            scenario: scenario.into(),
            started_at: Utc::now(),
            steps: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn add_step(&mut self, order: usize, step_id: &str, result: StepResult, elapsed: Duration) {
        self.steps.push(StepReport {
            order,
            step_id: step_id.to_string(),
            status: StepStatus::from(result.outcome.kind),
            message: result.outcome.render(),
            outcome: Some(result.outcome),
            records: result.records,
            duration_ms: elapsed.as_millis() as u64,
        });
    }

    pub fn add_skipped(&mut self, order: usize, step_id: &str) {
        self.steps.push(StepReport {
            order,
            step_id: step_id.to_string(),
            status: StepStatus::Skipped,
            message: String::from("Skipped after an earlier step did not pass"),
            outcome: None,
            records: Vec::new(),
            duration_ms: 0,
        });
    }

    pub fn finish(self) -> ScenarioReport {
        let summary = Self::generate_summary(&self.steps);
        ScenarioReport {
            run_id: self.run_id,
            scenario: self.scenario,
            metadata: RunMetadata {
                host: HostContext::from_system(),
                started_at: self.started_at,
                finished_at: Utc::now(),
            },
            passed: summary.all_passed(),
            steps: self.steps,
            summary,
        }
    }

    pub fn generate_summary(steps: &[StepReport]) -> RunSummary {
        let mut summary = RunSummary {
            total: steps.len(),
            ..Default::default()
        };
        for step in steps {
            match step.status {
                StepStatus::Passed => summary.passed += 1,
                StepStatus::Failed => summary.failed += 1,
                StepStatus::Error => summary.errors += 1,
                StepStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::types::Outcome;

    #[test]
    fn test_report_counts_and_overall_status() {
        let mut builder = ReportBuilder::new("lead checks");
        builder.add_step(
            1,
            "CreateLead",
            Outcome::pass("Successfully created Lead with ID %s", vec!["00Q1".into()]).into(),
            Duration::from_millis(4),
        );
        builder.add_step(
            2,
            "LeadFieldEquals",
            Outcome::fail("Expected %s field to be %s, but it was actually %s.", vec![
                "Status".into(),
                "Open".into(),
                "Closed".into(),
            ])
            .into(),
            Duration::from_millis(2),
        );
        builder.add_skipped(3, "DeleteLead");

        let report = builder.finish();
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.skipped, 1);
        assert!(!report.passed);
        assert_eq!(report.steps[0].message, "Successfully created Lead with ID 00Q1");
        assert_eq!(report.steps[2].status, StepStatus::Skipped);
        assert!(uuid::Uuid::parse_str(&report.run_id).is_ok());
    }

    #[test]
    fn test_report_json_round_trip() {
        let mut builder = ReportBuilder::new("single");
        builder.add_step(1, "S", Outcome::pass("ok", vec![]).into(), Duration::ZERO);
        let report = builder.finish();
        let parsed = ScenarioReport::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert!(parsed.passed);
    }
}
