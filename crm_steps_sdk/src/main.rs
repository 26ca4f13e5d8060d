//! # CRM Steps CLI
//!
//! Runs scenario files against a fixture-backed CRM and lists the registered
//! step definitions.

use clap::{Parser, Subcommand};
use crm_steps_base::api::{RunnerConfig, Scenario, ScenarioRunner};
use crm_steps_base::logging::{self, codes, FacadeLogger, LogLevel, LoggingService};
use crm_steps_base::results::{write_json_report, BatchReport};
use crm_steps_base::types::Operator;
use crm_steps_base::{log_error, log_info, log_success};
use crm_steps_sdk::client::InMemoryCrm;
use crm_steps_sdk::create_step_registry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "crm-steps")]
#[command(author, version, about = "Run CRM step scenarios", long_about = None)]
struct Cli {
    /// Runner configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario file or every scenario under a directory
    Run {
        /// Scenario file (.json) or directory
        path: PathBuf,

        /// CRM fixture file (JSON object of record arrays keyed by object name)
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Write the batch report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Scenarios run in parallel
        #[arg(long)]
        jobs: Option<usize>,
    },

    /// List registered step definitions and comparison operators
    Steps,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => RunnerConfig::load(path),
        None => RunnerConfig::from_env(),
    };
    let config = match loaded {
        Ok(config) => {
            init_logging(&config)?;
            config
        }
        Err(e) => {
            init_logging(&RunnerConfig::default())?;
            log_error!(e.code(), "Failed to load configuration", "error" => &e);
            return Err(e.into());
        }
    };
    log_success!(codes::success::CONFIG_LOADED, "Configuration loaded",
        "source" => cli.config
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "environment".to_string()),
        "missing_field_policy" => format!("{:?}", config.missing_field_policy),
        "fail_fast" => config.fail_fast
    );

    match cli.command {
        Commands::Run {
            path,
            fixtures,
            output,
            jobs,
        } => {
            let all_passed = run_scenarios(&path, fixtures.as_deref(), output.as_deref(), jobs, config)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Steps => list_steps(&config)?,
    }

    Ok(())
}

fn init_logging(config: &RunnerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match config.log_level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warning => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .init();

    let service = LoggingService::new(
        Arc::new(FacadeLogger::new(config.structured_logging)),
        config.log_level,
    );
    logging::init_global_logging_with_service(Arc::new(service))?;
    Ok(())
}

fn run_scenarios(
    path: &Path,
    fixtures: Option<&Path>,
    output: Option<&Path>,
    jobs: Option<usize>,
    config: RunnerConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let crm = match fixtures {
        Some(fixtures) => InMemoryCrm::load(fixtures).inspect_err(|e| {
            log_error!(codes::client::FIXTURE_LOAD_FAILURE, "Failed to load fixtures",
                "path" => fixtures.display(),
                "error" => e
            );
        })?,
        None => InMemoryCrm::new(),
    };

    let registry = create_step_registry(Arc::new(crm), &config)?;
    let stats = registry.get_statistics();
    if !stats.registry_health.is_healthy() {
        return Err(format!("Step registry is {}", stats.registry_health.as_str()).into());
    }
    log_success!(codes::success::REGISTRY_READY, "Step registry ready",
        "steps" => stats.total_steps,
        "validation_steps" => stats.validation_steps,
        "action_steps" => stats.action_steps
    );

    let scenarios = collect_scenarios(path)?;
    if scenarios.is_empty() {
        return Err(format!("No scenario files found under {}", path.display()).into());
    }

    let jobs = jobs.or(config.max_jobs).unwrap_or_else(num_cpus::get);
    let runner = ScenarioRunner::with_config(Arc::new(registry), config.with_max_jobs(Some(jobs)));
    log_info!("Running scenarios", "count" => scenarios.len(), "jobs" => jobs);

    let batch = runner.run_batch(&scenarios)?;
    print_batch(&batch);

    if let Some(output) = output {
        write_json_report(&batch, output).inspect_err(|e| {
            log_error!(codes::scenario::REPORT_WRITE_FAILURE, "Failed to write report",
                "path" => output.display(),
                "error" => e
            );
        })?;
        log_success!(codes::success::REPORT_WRITTEN, "Report written",
            "path" => output.display()
        );
    }

    Ok(batch.all_passed())
}

/// A single file, or every `*.json` file under a directory in path order.
fn collect_scenarios(path: &Path) -> Result<Vec<Scenario>, Box<dyn std::error::Error>> {
    if path.is_file() {
        return Ok(vec![load_scenario(path)?]);
    }
    if !path.is_dir() {
        return Err(format!("Input must be a scenario file or directory: {}", path.display()).into());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    files.iter().map(|file| load_scenario(file)).collect()
}

fn load_scenario(path: &Path) -> Result<Scenario, Box<dyn std::error::Error>> {
    Scenario::load(path).map_err(|e| {
        log_error!(codes::scenario::SCENARIO_LOAD_FAILURE, "Failed to load scenario",
            "path" => path.display(),
            "error" => &e
        );
        Box::<dyn std::error::Error>::from(e)
    })
}

fn print_batch(batch: &BatchReport) {
    for report in &batch.reports {
        println!(
            "{} in {:.2}s",
            report.summary_line(),
            report.metadata.duration_seconds()
        );
        for step in &report.steps {
            println!("  [{:?}] {} {}: {}", step.status, step.order, step.step_id, step.message);
        }
    }
    println!(
        "\n{}/{} scenarios passed",
        batch.passed_scenarios, batch.total_scenarios
    );
}

fn list_steps(config: &RunnerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = create_step_registry(Arc::new(InMemoryCrm::new()), config)?;
    let mut definitions = registry.definitions();
    definitions.sort_by(|a, b| a.step_id.cmp(&b.step_id));

    for definition in definitions {
        println!("{} ({:?}) {}", definition.step_id, definition.step_type, definition.name);
        println!("    {}", definition.expression);
    }

    let stats = registry.get_statistics();
    println!(
        "\n{} steps ({} validation, {} action, {} emitting records), registry {}",
        stats.total_steps,
        stats.validation_steps,
        stats.action_steps,
        stats.steps_emitting_records,
        stats.registry_health.as_str()
    );

    println!("\nOperators:");
    for operator in Operator::ALL {
        let operand = if operator.requires_expected_value() { "" } else { " (no expected value)" };
        println!("  {:<16} {}{}", operator.token(), operator.describe(), operand);
    }
    Ok(())
}
