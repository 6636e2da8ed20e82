//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while assembling a video.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Acquisition failed: {message}")]
    AcquisitionFailed { message: String },

    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an acquisition (download) failure error.
    pub fn acquisition_failed(message: impl Into<String>) -> Self {
        Self::AcquisitionFailed {
            message: message.into(),
        }
    }

    /// Create a decode failure error.
    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self::DecodeFailed(message.into())
    }

    /// Create a speech synthesis failure error.
    pub fn synthesis_failed(message: impl Into<String>) -> Self {
        Self::SynthesisFailed(message.into())
    }

    /// Create an encoding failure error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed(message.into())
    }

    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MediaError::FfmpegNotFound | MediaError::FfprobeNotFound => "tool_missing",
            MediaError::AcquisitionFailed { .. } => "acquisition",
            MediaError::DecodeFailed(_) | MediaError::FfprobeFailed { .. } => "decode",
            MediaError::SynthesisFailed(_) => "synthesis",
            MediaError::EncodingFailed(_) | MediaError::FfmpegFailed { .. } => "encoding",
            MediaError::Timeout(_) => "timeout",
            MediaError::FileNotFound(_) | MediaError::InvalidInput(_) => "invalid_input",
            MediaError::Io(_) | MediaError::JsonParse(_) | MediaError::Internal(_) => "internal",
        }
    }

    /// Check if retrying the same render could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MediaError::AcquisitionFailed { .. } | MediaError::Timeout(_) | MediaError::SynthesisFailed(_)
        )
    }
}
