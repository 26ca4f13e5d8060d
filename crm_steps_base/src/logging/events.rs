//! Event system for step logging

use super::codes::Code;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" | "trace" => Ok(LogLevel::Debug),
            other => Err(format!(
                "Invalid log level '{}'. Valid values: error, warning, info, debug",
                other
            )),
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            context: BTreeMap::new(),
        }
    }

    pub fn error(error_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, error_code, message)
    }

    /// Warnings may not have codes
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::new("I000"), message)
    }

    /// Info event with a success code
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, success_code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    pub fn category(&self) -> &'static str {
        super::codes::get_category(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        super::codes::get_severity(self.code.as_str()).as_str()
    }

    /// Format for display
    pub fn format(&self) -> String {
        let context = if self.context.is_empty() {
            String::new()
        } else {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!(" ({})", pairs.join(", "))
        };
        format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code.as_str(),
            self.message,
            context
        )
    }

    /// Format as JSON for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "recoverable": super::codes::is_recoverable(self.code.as_str()),
                "description": super::codes::get_description(self.code.as_str()),
                "recommended_action": super::codes::get_action(self.code.as_str()),
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}
