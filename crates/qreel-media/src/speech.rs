//! Speech synthesis for the optional voice-over.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Text-to-speech collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Write spoken `text` in voice `voice_id` to `output_path`.
    async fn synthesize(&self, text: &str, voice_id: &str, output_path: &Path) -> MediaResult<()>;
}

/// Synthesizer backed by the `edge-tts` command line tool.
#[derive(Debug, Clone)]
pub struct EdgeTtsSynthesizer {
    binary: String,
    timeout: Duration,
}

impl Default for EdgeTtsSynthesizer {
    fn default() -> Self {
        Self {
            binary: "edge-tts".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl EdgeTtsSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (name on PATH or absolute path).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for EdgeTtsSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str, output_path: &Path) -> MediaResult<()> {
        which::which(&self.binary)
            .map_err(|_| MediaError::synthesis_failed(format!("{} not found in PATH", self.binary)))?;

        debug!(voice = voice_id, output = %output_path.display(), "Synthesizing speech");

        let child = Command::new(&self.binary)
            .arg("--voice")
            .arg(voice_id)
            .arg("--text")
            .arg(text)
            .arg("--write-media")
            .arg(output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| {
                MediaError::synthesis_failed(format!(
                    "{} timed out after {}s",
                    self.binary,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| MediaError::synthesis_failed(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(MediaError::synthesis_failed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let written = tokio::fs::metadata(output_path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            return Err(MediaError::synthesis_failed("synthesizer produced no audio"));
        }

        Ok(())
    }
}
