//! Error taxonomy shared by the router, composer, storage and HTTP surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// The caller sent something we cannot act on (empty messages, unknown pattern, bad JSON).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The model gateway failed, or answered with output we could not use.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("model gateway call timed out")]
    Timeout,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AgentError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Upstream(format!("HTTP request failed: {}", err))
        }
    }
}

pub type Result<T, E = AgentError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AgentError::bad_request("messages must not be empty").to_string(),
            "bad request: messages must not be empty"
        );
        assert_eq!(
            AgentError::UnknownAgent("poet".to_string()).to_string(),
            "unknown agent 'poet'"
        );
        assert_eq!(AgentError::Timeout.to_string(), "model gateway call timed out");
    }

    #[test]
    fn test_storage_error_from_anyhow() {
        let err: AgentError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, AgentError::Storage(_)));
        assert_eq!(err.to_string(), "storage error: disk full");
    }
}
