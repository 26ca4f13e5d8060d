use std::path::PathBuf;

/// Errors raised at the CRM client boundary
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("No {object} found with {criteria}")]
    NotFound { object: String, criteria: String },

    #[error("Request to {object} failed: {reason}")]
    RequestFailed { object: String, reason: String },

    #[error("Invalid {object} record: {reason}")]
    InvalidRecord { object: String, reason: String },

    #[error("Failed to read fixtures '{path}': {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixtures '{path}': {reason}")]
    FixtureFormat { path: PathBuf, reason: String },
}

impl ClientError {
    pub fn not_found(object: &str, criteria: impl Into<String>) -> Self {
        Self::NotFound {
            object: object.to_string(),
            criteria: criteria.into(),
        }
    }

    pub fn request_failed(object: &str, reason: impl Into<String>) -> Self {
        Self::RequestFailed {
            object: object.to_string(),
            reason: reason.into(),
        }
    }
}
