// results/error.rs

use std::path::PathBuf;

/// Errors raised while persisting reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize `value` as pretty JSON and write it to `path`.
pub fn write_json_report<T: serde::Serialize>(
    value: &T,
    path: &std::path::Path,
) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_write_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json_report(&serde_json::json!({"ok": true}), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"ok\": true"));

        let bad = dir.path().join("missing").join("report.json");
        assert_matches!(
            write_json_report(&serde_json::json!({}), &bad),
            Err(ReportError::Write { .. })
        );
    }
}
