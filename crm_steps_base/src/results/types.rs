//! # Step and Scenario Result Types
//!
//! Outcomes produced by steps, the records creation steps emit, and the
//! serializable reports assembled from a scenario run.

use crate::types::common::{FieldValue, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result kind of one step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    /// The assertion held or the action succeeded.
    Pass,
    /// The assertion did not hold.
    Fail,
    /// The assertion could not be evaluated.
    Error,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }
}

/// Tri-state step outcome carrying an unrendered message.
///
/// The template uses positional `%s` placeholders filled from `args` in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message_template: String,
    pub args: Vec<FieldValue>,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, template: impl Into<String>, args: Vec<FieldValue>) -> Self {
        Self {
            kind,
            message_template: template.into(),
            args,
        }
    }

    pub fn pass(template: impl Into<String>, args: Vec<FieldValue>) -> Self {
        Self::new(OutcomeKind::Pass, template, args)
    }

    pub fn fail(template: impl Into<String>, args: Vec<FieldValue>) -> Self {
        Self::new(OutcomeKind::Fail, template, args)
    }

    pub fn error(template: impl Into<String>, args: Vec<FieldValue>) -> Self {
        Self::new(OutcomeKind::Error, template, args)
    }

    pub fn is_pass(&self) -> bool {
        self.kind == OutcomeKind::Pass
    }

    pub fn is_error(&self) -> bool {
        self.kind == OutcomeKind::Error
    }

    /// Substitute `args` into the template in order. Placeholders without a
    /// matching argument stay as `%s`; surplus arguments are ignored.
    pub fn render(&self) -> String {
        let mut rendered = String::with_capacity(self.message_template.len());
        let mut args = self.args.iter();
        let mut rest = self.message_template.as_str();

        while let Some(pos) = rest.find("%s") {
            rendered.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => rendered.push_str(&arg.to_string()),
                None => rendered.push_str("%s"),
            }
            rest = &rest[pos + 2..];
        }
        rendered.push_str(rest);
        rendered
    }
}

/// Shape of a step record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    KeyValue,
}

/// Named snapshot of step output, usable by later steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub id: String,
    pub name: String,
    pub record_type: RecordType,
    pub fields: Record,
}

impl StepRecord {
    pub fn key_value(id: impl Into<String>, name: impl Into<String>, fields: Record) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            record_type: RecordType::KeyValue,
            fields,
        }
    }

    /// The plain and position-qualified records a creation step emits, e.g.
    /// `lead` / "Created Lead" and `lead.3` / "Created Lead from Step 3".
    pub fn created_pair(id: &str, label: &str, fields: Record, step_order: usize) -> Vec<Self> {
        vec![
            Self::key_value(id, format!("Created {}", label), fields.clone()),
            Self::key_value(
                format!("{}.{}", id, step_order),
                format!("Created {} from Step {}", label, step_order),
                fields,
            ),
        ]
    }
}

/// What a step hands back: the outcome plus any records it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<StepRecord>,
}

impl StepResult {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            records: Vec::new(),
        }
    }

    pub fn with_records(mut self, records: Vec<StepRecord>) -> Self {
        self.records = records;
        self
    }
}

impl From<Outcome> for StepResult {
    fn from(outcome: Outcome) -> Self {
        Self::new(outcome)
    }
}

// ============================================================================
// Scenario reports
// ============================================================================

/// Status of a step within a scenario report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    Failed,
    Error,
    /// Not executed because an earlier step did not pass under fail-fast.
    Skipped,
}

impl From<OutcomeKind> for StepStatus {
    fn from(kind: OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Pass => Self::Passed,
            OutcomeKind::Fail => Self::Failed,
            OutcomeKind::Error => Self::Error,
        }
    }
}

/// One step's entry in a scenario report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub order: usize,
    pub step_id: String,
    pub status: StepStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<StepRecord>,
    pub duration_ms: u64,
}

/// Host execution context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostContext {
    pub hostname: String,
    pub os_info: String,
}

impl HostContext {
    pub fn from_system() -> Self {
        Self {
            hostname: hostname::get()
                .unwrap_or_else(|_| std::ffi::OsString::from("unknown"))
                .to_string_lossy()
                .to_string(),
            os_info: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

/// Run timing and origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub host: HostContext,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunMetadata {
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Per-status step counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Every step ran and passed. An empty scenario does not pass.
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }
}

/// Complete result of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub run_id: String,
    pub scenario: String,
    pub metadata: RunMetadata,
    pub steps: Vec<StepReport>,
    pub summary: RunSummary,
    pub passed: bool,
}

impl ScenarioReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// One-line human summary, e.g. for console output.
    pub fn summary_line(&self) -> String {
        format!(
            "{} {}: {} passed, {} failed, {} errors, {} skipped ({:.1}%)",
            if self.passed { "PASS" } else { "FAIL" },
            self.scenario,
            self.summary.passed,
            self.summary.failed,
            self.summary.errors,
            self.summary.skipped,
            self.summary.pass_rate()
        )
    }
}

/// Reports from running several scenario files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub reports: Vec<ScenarioReport>,
    pub total_scenarios: usize,
    pub passed_scenarios: usize,
}

impl BatchReport {
    pub fn new(reports: Vec<ScenarioReport>) -> Self {
        let passed_scenarios = reports.iter().filter(|r| r.passed).count();
        Self {
            total_scenarios: reports.len(),
            passed_scenarios,
            reports,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed_scenarios == self.total_scenarios
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_in_order() {
        let outcome = Outcome::fail(
            "Expected %s field to be %s, but it was actually %s.",
            vec!["Amount".into(), 10i64.into(), 5000i64.into()],
        );
        assert_eq!(
            outcome.render(),
            "Expected Amount field to be 10, but it was actually 5000."
        );
    }

    #[test]
    fn test_render_leaves_unfilled_placeholders() {
        let outcome = Outcome::error("%s and %s", vec!["one".into()]);
        assert_eq!(outcome.render(), "one and %s");

        let outcome = Outcome::pass("The %s field was set, as expected.", vec!["A".into(), "B".into()]);
        assert_eq!(outcome.render(), "The A field was set, as expected.");
    }

    #[test]
    fn test_created_pair() {
        let records = StepRecord::created_pair(
            "lead",
            "Lead",
            Record::new().with_field("Id", "00Q1"),
            3,
        );
        assert_eq!(records[0].id, "lead");
        assert_eq!(records[0].name, "Created Lead");
        assert_eq!(records[1].id, "lead.3");
        assert_eq!(records[1].name, "Created Lead from Step 3");
        assert_eq!(records[1].fields.id(), Some("00Q1".to_string()));
    }

    #[test]
    fn test_outcome_serializes_kind_lowercase() {
        let json = serde_json::to_value(Outcome::pass("ok", vec![])).unwrap();
        assert_eq!(json["kind"], "pass");
    }

    #[test]
    fn test_summary_pass_rules() {
        let empty = RunSummary::default();
        assert!(!empty.all_passed());
        let summary = RunSummary {
            total: 2,
            passed: 2,
            ..Default::default()
        };
        assert!(summary.all_passed());
        assert_eq!(summary.pass_rate(), 100.0);
    }

    #[test]
    fn test_run_duration() {
        let started_at = Utc::now();
        let metadata = RunMetadata {
            host: HostContext::from_system(),
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(1500),
        };
        assert_eq!(metadata.duration_seconds(), 1.5);
    }
}
