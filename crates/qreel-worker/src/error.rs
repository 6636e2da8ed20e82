//! Service error types.

use qreel_matcher::MatchError;
use qreel_media::MediaError;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No footage matched: {0}")]
    NoMatch(String),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Matching error: {0}")]
    Match(MatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn no_match(msg: impl Into<String>) -> Self {
        Self::NoMatch(msg.into())
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::Media(e) => e.is_retryable(),
            WorkerError::Match(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// `EX_TEMPFAIL` from sysexits.h: the command may succeed if run again.
pub const EX_TEMPFAIL: u8 = 75;

/// Whether anything in the failure chain of a command is transient.
pub fn is_retryable_failure(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<WorkerError>() {
            e.is_retryable()
        } else if let Some(e) = cause.downcast_ref::<MediaError>() {
            e.is_retryable()
        } else if let Some(e) = cause.downcast_ref::<MatchError>() {
            e.is_retryable()
        } else {
            false
        }
    })
}

/// Missing provider credentials are a configuration problem, not a matching failure.
impl From<MatchError> for WorkerError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Config(msg) => WorkerError::Config(msg),
            other => WorkerError::Match(other),
        }
    }
}
