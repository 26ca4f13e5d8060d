//! Logging service and logger implementations

use super::codes::Code;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex, MutexGuard};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Logging service with level filtering
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }
}

/// Build a service that writes to stdout/stderr, as text or JSON lines.
pub fn create_configured_service(min_level: LogLevel, structured: bool) -> LoggingService {
    let logger: Arc<dyn Logger> = if structured {
        Arc::new(StructuredLogger::new(min_level))
    } else {
        Arc::new(ConsoleLogger::new(min_level))
    };
    LoggingService::new(logger, min_level)
}

/// Simple console logger
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.level {
                LogLevel::Error => eprintln!("{}", event.format()),
                _ => println!("{}", event.format()),
            }
        }
    }
}

/// Structured logger emitting one JSON object per line
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let line = event.format_json().unwrap_or_else(|_| event.format());
            match event.level {
                LogLevel::Error => eprintln!("{}", line),
                _ => println!("{}", line),
            }
        }
    }
}

/// Forwards events to the `log` facade under the `crm_steps` target.
#[cfg(feature = "logging")]
pub struct FacadeLogger {
    structured: bool,
}

#[cfg(feature = "logging")]
impl FacadeLogger {
    pub fn new(structured: bool) -> Self {
        Self { structured }
    }
}

#[cfg(feature = "logging")]
impl Logger for FacadeLogger {
    fn log(&self, event: &LogEvent) {
        let level = match event.level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        };
        if self.structured {
            let line = event.format_json().unwrap_or_else(|_| event.format());
            log::log!(target: "crm_steps", level, "{}", line);
        } else {
            log::log!(target: "crm_steps", level, "{}", event.format());
        }
    }
}

/// Memory logger for testing
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn events(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events().clone()
    }

    pub fn clear(&self) {
        self.events().clear();
    }

    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.events().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.events().iter().filter(|e| e.is_warning()).cloned().collect()
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.events()
            .iter()
            .filter(|e| e.code == code)
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.events().iter().any(|e| e.is_error() && e.code == code)
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        self.events().push(event.clone());
    }
}

/// Sends each event to several loggers
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
}

impl MultiLogger {
    pub fn new(loggers: Vec<Arc<dyn Logger>>) -> Self {
        Self { loggers }
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        for logger in &self.loggers {
            logger.log(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Info);

        service.log_event(LogEvent::debug("hidden"));
        service.log_info("shown");
        service.log_error(codes::registry::UNKNOWN_STEP, "Unknown step");

        assert_eq!(memory.event_count(), 2);
        assert_eq!(memory.get_errors().len(), 1);
        assert!(memory.has_error_with_code(codes::registry::UNKNOWN_STEP));
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let first = Arc::new(MemoryLogger::new());
        let second = Arc::new(MemoryLogger::new());
        let multi = MultiLogger::new(vec![first.clone() as Arc<dyn Logger>, second.clone()]);
        multi.log(&LogEvent::warning("careful"));
        assert_eq!(first.get_warnings().len(), 1);
        assert_eq!(second.get_warnings().len(), 1);
    }
}
