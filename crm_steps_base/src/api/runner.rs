//! # Scenario Runner
//!
//! Executes scenarios step by step against a shared [`StepRegistry`] and
//! turns each run into a [`ScenarioReport`].

use super::config::RunnerConfig;
use super::scenario::Scenario;
use crate::logging::{self, codes};
use crate::results::{BatchReport, Outcome, ReportBuilder, ScenarioReport, StepResult};
use crate::strategies::{StepRegistry, StrategyError};
use crate::types::{ScenarioContext, StepData};
use crate::{log_debug, log_error, log_info, log_success};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub const UNKNOWN_STEP_TEMPLATE: &str = "Unknown step '%s'";

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Worker thread panicked while running scenarios")]
    WorkerPanicked,
}

/// Runs scenarios against a registry
pub struct ScenarioRunner {
    registry: Arc<StepRegistry>,
    config: RunnerConfig,
}

impl ScenarioRunner {
    pub fn new(registry: StepRegistry) -> Self {
        Self::with_config(Arc::new(registry), RunnerConfig::default())
    }

    pub fn with_config(registry: Arc<StepRegistry>, config: RunnerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every step of `scenario` in order.
    ///
    /// Records from passing steps are added to the context so later steps can
    /// see them. With `fail_fast`, steps after the first non-passing one are
    /// reported as skipped.
    pub fn run(&self, scenario: &Scenario) -> ScenarioReport {
        let mut context = ScenarioContext::new(scenario.name.as_str());
        let mut report = ReportBuilder::new(scenario.name.as_str());
        let mut halted = false;

        log_info!("Running scenario",
            "scenario" => scenario.name,
            "run_id" => report.run_id(),
            "steps" => scenario.steps.len()
        );

        for step in &scenario.steps {
            let order = context.begin_step();

            if halted {
                log_debug!("Skipping step", "step_id" => step.step_id, "order" => order);
                report.add_skipped(order, &step.step_id);
                continue;
            }

            let started = Instant::now();
            let result = logging::with_step_context(&scenario.name, order, || {
                self.run_step(&step.step_id, &step.data, &context)
            });

            let passed = result.outcome.is_pass();
            if passed {
                context.add_records(result.records.iter().cloned());
            } else if self.config.fail_fast {
                halted = true;
            }
            report.add_step(order, &step.step_id, result, started.elapsed());
        }

        let report = report.finish();
        if report.passed {
            log_success!(codes::success::SCENARIO_COMPLETED, "Scenario passed",
                "scenario" => report.scenario,
                "summary" => report.summary_line()
            );
        } else {
            log_info!("Scenario did not pass",
                "scenario" => report.scenario,
                "summary" => report.summary_line()
            );
        }
        report
    }

    fn run_step(
        &self,
        step_id: &str,
        data: &StepData,
        context: &ScenarioContext,
    ) -> StepResult {
        match self.registry.run(step_id, data, context) {
            Ok(result) => result,
            Err(StrategyError::UnknownStep(id)) => {
                Outcome::error(UNKNOWN_STEP_TEMPLATE, vec![id.into()]).into()
            }
            Err(e) => {
                log_error!(codes::scenario::STEP_ERRORED, "Step could not be run",
                    "step_id" => step_id,
                    "error" => e
                );
                Outcome::error("%s", vec![e.to_string().into()]).into()
            }
        }
    }

    /// Run many scenarios on up to `max_jobs` threads.
    ///
    /// Reports come back in the same order as `scenarios`.
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Result<BatchReport, RunnerError> {
        let jobs = self.job_count(scenarios.len());
        if jobs <= 1 {
            let reports = scenarios.iter().map(|s| self.run(s)).collect();
            return Ok(BatchReport::new(reports));
        }

        let per_thread = scenarios.len().div_ceil(jobs);
        log_debug!("Running scenarios in parallel",
            "scenarios" => scenarios.len(),
            "threads" => jobs,
            "per_thread" => per_thread
        );

        let reports = thread::scope(|scope| {
            let handles: Vec<_> = scenarios
                .chunks(per_thread)
                .map(|chunk| scope.spawn(move || chunk.iter().map(|s| self.run(s)).collect::<Vec<_>>()))
                .collect();

            let mut reports = Vec::with_capacity(scenarios.len());
            for handle in handles {
                let chunk = handle.join().map_err(|_| {
                    log_error!(codes::system::INTERNAL_ERROR, "Scenario worker panicked");
                    RunnerError::WorkerPanicked
                })?;
                reports.extend(chunk);
            }
            Ok::<_, RunnerError>(reports)
        })?;

        Ok(BatchReport::new(reports))
    }

    fn job_count(&self, scenario_count: usize) -> usize {
        let available = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.config
            .max_jobs
            .unwrap_or(available)
            .min(scenario_count)
            .max(1)
    }
}
