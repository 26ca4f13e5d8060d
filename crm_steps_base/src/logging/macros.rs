//! Logging macros taking `"key" => value` context pairs with Display values

/// Log error with a Code
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_error_with_context($code, $message, context_refs)
        }
    };
}

/// Log success with a Code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_success_with_context($code, $message, context_refs)
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_with_context($crate::logging::LogEvent::info($message), vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context($crate::logging::LogEvent::info($message), context_refs)
        }
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_with_context($crate::logging::LogEvent::warning($message), vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context($crate::logging::LogEvent::warning($message), context_refs)
        }
    };
}

/// Log debug message. Context values are only formatted when debug output is on.
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_with_context($crate::logging::LogEvent::debug($message), vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if $crate::logging::debug_enabled() {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context($crate::logging::LogEvent::debug($message), context_refs)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[test]
    fn test_macros_are_noops_without_logger() {
        let duration = std::time::Duration::from_millis(150);

        log_error!(codes::registry::UNKNOWN_STEP, "Unknown step requested",
            "step_id" => "Nope"
        );
        log_success!(codes::success::SCENARIO_COMPLETED, "Scenario completed",
            "steps" => 3,
            "duration_ms" => duration.as_millis()
        );
        log_info!("Loading scenario", "path" => std::path::Path::new("a.json").display());
        log_warning!("Record lookup failed");
        log_debug!("Phase change", "to" => "resolved");
    }
}
