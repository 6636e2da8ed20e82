//! Application configuration.

use std::net::SocketAddr;

use qreel_matcher::MatchProvider;
use qreel_media::RenderConfig;

use crate::error::{WorkerError, WorkerResult};

/// Voice used for narration when none is configured.
pub const DEFAULT_VOICE: &str = "en-US-GuyNeural";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Footage provider used for matching
    pub provider: MatchProvider,
    /// Narration voice; `None` renders silent videos
    pub voice: Option<String>,
    /// Prometheus exporter address; `None` disables the exporter
    pub metrics_listen_addr: Option<SocketAddr>,
    pub render: RenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: MatchProvider::Pexels,
            voice: Some(DEFAULT_VOICE.to_string()),
            metrics_listen_addr: None,
            render: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    ///
    /// `QREEL_VOICE=none` disables narration.
    pub fn from_env() -> WorkerResult<Self> {
        let defaults = Self::default();

        let provider = match std::env::var("QREEL_PROVIDER") {
            Ok(value) => value.parse().map_err(WorkerError::config)?,
            Err(_) => defaults.provider,
        };

        let voice = match std::env::var("QREEL_VOICE") {
            Ok(value) => parse_voice(&value),
            Err(_) => defaults.voice,
        };

        let metrics_listen_addr = match std::env::var("METRICS_LISTEN_ADDR") {
            Ok(addr) if !addr.trim().is_empty() => Some(addr.trim().parse().map_err(|e| {
                WorkerError::config(format!("invalid METRICS_LISTEN_ADDR '{}': {}", addr, e))
            })?),
            _ => None,
        };

        Ok(Self {
            provider,
            voice,
            metrics_listen_addr,
            render: RenderConfig::from_env(),
        })
    }
}

fn parse_voice(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, MatchProvider::Pexels);
        assert_eq!(config.voice.as_deref(), Some(DEFAULT_VOICE));
        assert!(config.metrics_listen_addr.is_none());
    }

    #[test]
    fn test_parse_voice() {
        assert_eq!(parse_voice(" en-GB-SoniaNeural "), Some("en-GB-SoniaNeural".to_string()));
        assert_eq!(parse_voice("None"), None);
        assert_eq!(parse_voice(""), None);
    }
}
