//! Error types for content matching.

use thiserror::Error;

/// Result type for matcher operations.
pub type MatchResult<T> = Result<T, MatchError>;

/// Errors that can occur while matching a quote to footage.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("{provider} request failed: {message}")]
    Provider { provider: String, message: String },

    #[error("No match: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MatchError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchError::Generation(_) => "generation",
            MatchError::Provider { .. } => "provider",
            MatchError::NotFound(_) => "not_found",
            MatchError::Network(_) => "network",
            MatchError::Json(_) => "json",
            MatchError::Config(_) => "config",
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            MatchError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
