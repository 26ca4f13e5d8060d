//! # Runner Configuration
//!
//! Settings come from built-in defaults, an optional TOML file, and finally
//! `CRM_STEPS_*` environment variables, each layer overriding the previous.

use crate::execution::MissingFieldPolicy;
use crate::logging::{codes, Code, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_FAIL_FAST: &str = "CRM_STEPS_FAIL_FAST";
pub const ENV_MISSING_FIELD_POLICY: &str = "CRM_STEPS_MISSING_FIELD_POLICY";
pub const ENV_LOG_LEVEL: &str = "CRM_STEPS_LOG_LEVEL";
pub const ENV_STRUCTURED_LOGGING: &str = "CRM_STEPS_STRUCTURED_LOGGING";
pub const ENV_MAX_JOBS: &str = "CRM_STEPS_MAX_JOBS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Log code reported when this error stops a run.
    pub fn code(&self) -> Code {
        match self {
            Self::Read { .. } | Self::Parse { .. } => codes::config::CONFIG_LOAD_FAILURE,
            Self::InvalidValue { .. } => codes::config::INVALID_CONFIG_VALUE,
        }
    }
}

/// Configuration for scenario runs
///
/// Controls how validation steps treat missing fields, whether a scenario
/// stops at its first non-passing step, and how logging is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Outcome kind when a compared field is absent from the fetched record
    pub missing_field_policy: MissingFieldPolicy,

    /// Skip remaining steps after a step fails or errors
    pub fail_fast: bool,

    pub log_level: LogLevel,

    /// Emit JSON lines instead of plain text
    pub structured_logging: bool,

    /// Upper bound on scenarios run in parallel; `None` uses every core
    pub max_jobs: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            missing_field_policy: MissingFieldPolicy::Error,
            fail_fast: true,
            log_level: LogLevel::Info,
            structured_logging: false,
            max_jobs: None,
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::read_file(path)?.apply_env_overrides()
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults plus environment overrides, for runs without a config file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env_overrides()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Unset keys leave values untouched.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_FAIL_FAST) {
            self.fail_fast = parse_bool(ENV_FAIL_FAST, &value)?;
        }
        if let Some(value) = lookup(ENV_MISSING_FIELD_POLICY) {
            self.missing_field_policy =
                value
                    .parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: ENV_MISSING_FIELD_POLICY.to_string(),
                        value: value.clone(),
                        reason,
                    })?;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = value.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL.to_string(),
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(value) = lookup(ENV_STRUCTURED_LOGGING) {
            self.structured_logging = parse_bool(ENV_STRUCTURED_LOGGING, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_JOBS) {
            let jobs = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|jobs| *jobs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_MAX_JOBS.to_string(),
                    value: value.clone(),
                    reason: "expected a positive integer".to_string(),
                })?;
            self.max_jobs = Some(jobs);
        }
        Ok(self)
    }

    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = policy;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_structured_logging(mut self, structured: bool) -> Self {
        self.structured_logging = structured;
        self
    }

    pub fn with_max_jobs(mut self, max_jobs: Option<usize>) -> Self {
        self.max_jobs = max_jobs.filter(|jobs| *jobs > 0);
        self
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.missing_field_policy, MissingFieldPolicy::Error);
        assert!(config.fail_fast);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.max_jobs, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RunnerConfig::from_toml_str(
            "missing_field_policy = \"fail\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(config.missing_field_policy, MissingFieldPolicy::Fail);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.fail_fast);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(RunnerConfig::from_toml_str("fail_fats = false").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fail_fast = false\nmax_jobs = 4").unwrap();

        let config = RunnerConfig::read_file(file.path()).unwrap();
        assert!(!config.fail_fast);
        assert_eq!(config.max_jobs, Some(4));
    }

    #[test]
    fn test_load_missing_file() {
        let result = RunnerConfig::load(Path::new("/definitely/not/here.toml"));
        assert_matches!(result, Err(ConfigError::Read { .. }));
    }

    #[test]
    fn test_overrides_apply_in_order() {
        let vars: HashMap<&str, &str> = [
            (ENV_FAIL_FAST, "no"),
            (ENV_MISSING_FIELD_POLICY, "FAIL"),
            (ENV_STRUCTURED_LOGGING, "1"),
            (ENV_MAX_JOBS, "3"),
        ]
        .into_iter()
        .collect();

        let config = RunnerConfig::default()
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert!(!config.fail_fast);
        assert_eq!(config.missing_field_policy, MissingFieldPolicy::Fail);
        assert!(config.structured_logging);
        assert_eq!(config.max_jobs, Some(3));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_invalid_override_reports_key() {
        let result = RunnerConfig::default().apply_overrides(|key| {
            (key == ENV_MAX_JOBS).then(|| "zero".to_string())
        });
        assert_matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == ENV_MAX_JOBS);
    }

    #[test]
    fn test_error_codes() {
        let missing = RunnerConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(missing.code(), codes::config::CONFIG_LOAD_FAILURE);

        let invalid = RunnerConfig::default()
            .apply_overrides(|key| (key == ENV_FAIL_FAST).then(|| "maybe".to_string()))
            .unwrap_err();
        assert_eq!(invalid.code(), codes::config::INVALID_CONFIG_VALUE);
    }
}
