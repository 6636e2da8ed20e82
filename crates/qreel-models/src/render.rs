//! Render request and result models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::{FrameSize, Quote};

/// Default length of a rendered video, in seconds.
pub const DEFAULT_TARGET_DURATION_SECS: f64 = 15.0;

/// Unique identifier for one render, used for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RenderId(pub String);

impl RenderId {
    /// Generate a new random render ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for file names.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl Default for RenderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Voice-over selection for a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum VoiceSpec {
    /// Synthesize narration of the quote text with the given voice.
    Synthesize { voice_id: String },
    /// Use an existing audio file owned by the caller.
    Prerecorded { path: PathBuf },
}

impl VoiceSpec {
    pub fn synthesize(voice_id: impl Into<String>) -> Self {
        Self::Synthesize {
            voice_id: voice_id.into(),
        }
    }
}

/// Everything one render needs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderSpec {
    /// Quote to caption
    pub quote: Quote,
    /// URL of the source clip
    pub source_url: String,
    /// Exact length of the output, in seconds
    pub target_duration_seconds: f64,
    /// Output frame size
    pub target_size: FrameSize,
    /// Optional voice-over
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceSpec>,
}

impl RenderSpec {
    /// Create a spec with the default duration and vertical frame size.
    pub fn new(quote: Quote, source_url: impl Into<String>) -> Self {
        Self {
            quote,
            source_url: source_url.into(),
            target_duration_seconds: DEFAULT_TARGET_DURATION_SECS,
            target_size: FrameSize::default(),
            voice: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.target_duration_seconds = seconds;
        self
    }

    pub fn with_size(mut self, size: FrameSize) -> Self {
        self.target_size = size;
        self
    }

    pub fn with_voice(mut self, voice: VoiceSpec) -> Self {
        self.voice = Some(voice);
        self
    }
}

/// A fully encoded video on persistent storage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderedVideo {
    /// Absolute path of the output file
    pub path: PathBuf,
    /// File name within the output directory
    pub file_name: String,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Frame size
    pub size: FrameSize,
    /// Whether a voice track was attached
    pub has_audio: bool,
    /// When encoding finished
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_spec_defaults() {
        let spec = RenderSpec::new(Quote::new("Stay strong.", "Anonymous"), "http://x/a.mp4");
        assert_eq!(spec.target_size, FrameSize::new(1080, 1920));
        assert_eq!(spec.target_duration_seconds, DEFAULT_TARGET_DURATION_SECS);
        assert!(spec.voice.is_none());
    }

    #[test]
    fn test_voice_spec_serde() {
        let voice = VoiceSpec::synthesize("en-US-GuyNeural");
        let json = serde_json::to_value(&voice).unwrap();
        assert_eq!(json["kind"], "synthesize");
        assert_eq!(json["voice_id"], "en-US-GuyNeural");
    }

    #[test]
    fn test_render_id_short() {
        let id = RenderId::new();
        assert_eq!(id.short().len(), 8);
        assert!(id.as_str().starts_with(id.short()));
    }
}
