//! Global logging for step execution
//!
//! A single [`LoggingService`] is installed once per process. The `log_*!`
//! macros route through it and attach the current thread's step context, so
//! events emitted deep inside a step can be traced back to the scenario and
//! step order that produced them. Every macro is a no-op until logging has
//! been initialized.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "logging")]
pub use service::FacadeLogger;
pub use service::{
    create_configured_service, ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger,
    StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static STEP_CONTEXT: RefCell<Option<StepLogContext>> = const { RefCell::new(None) };
}

/// Scenario and step currently executing on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLogContext {
    pub scenario: String,
    pub step_order: usize,
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the console or JSON-lines service at `min_level`.
pub fn init_global_logging(min_level: LogLevel, structured: bool) -> Result<(), String> {
    init_global_logging_with_service(Arc::new(create_configured_service(min_level, structured)))
}

/// Install a caller-built service (tests, `log` facade forwarding)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER.set(service.clone()).map_err(|_| {
        let message = "Global logger already initialized";
        crate::log_error!(codes::system::INITIALIZATION_FAILURE, message);
        message.to_string()
    })?;

    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));
    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// True when a debug event would actually be written.
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// STEP CONTEXT MANAGEMENT
// ============================================================================

pub fn set_step_context(scenario: &str, step_order: usize) {
    STEP_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(StepLogContext {
            scenario: scenario.to_string(),
            step_order,
        });
    });
}

pub fn clear_step_context() {
    STEP_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with the step context set, clearing it afterwards.
pub fn with_step_context<F, R>(scenario: &str, step_order: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_step_context(scenario, step_order);
    let result = f();
    clear_step_context();
    result
}

pub fn get_current_step_context() -> Option<StepLogContext> {
    STEP_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn attach_context(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(step) = get_current_step_context() {
        event = event
            .with_context("scenario", &step.scenario)
            .with_context("step", &step.step_order.to_string());
    }
    event
}

/// Attach pairs plus step context and hand the event to the global service.
pub fn log_with_context(event: LogEvent, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        if logger.should_log(event.level) {
            logger.log_event(attach_context(event, context));
        }
    }
}

/// Used by `log_error!`
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    log_with_context(LogEvent::error(code, message), context);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    log_with_context(LogEvent::success(code, message), context);
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    log_with_context(LogEvent::info(message), context);
}
