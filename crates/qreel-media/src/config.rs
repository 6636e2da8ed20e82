//! Render configuration.

use std::path::PathBuf;
use std::time::Duration;

use qreel_models::{CaptionStyle, EncodingConfig, FrameSize, DEFAULT_TARGET_DURATION_SECS};

use crate::geometry::FitPolicy;

/// Immutable settings shared by every render of one pipeline.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory finished videos are moved into
    pub output_dir: PathBuf,
    /// Parent of the per-render scratch directories
    pub work_dir: PathBuf,
    /// Frame size used when a request does not override it
    pub target_size: FrameSize,
    /// Duration used when a request does not override it
    pub target_duration: f64,
    /// How the source frame is mapped onto the target
    pub fit_policy: FitPolicy,
    pub caption_style: CaptionStyle,
    pub encoding: EncodingConfig,
    /// Kill FFmpeg after this long
    pub ffmpeg_timeout: Duration,
    /// Per-request timeout for the source download
    pub download_timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            work_dir: std::env::temp_dir().join("qreel"),
            target_size: FrameSize::default(),
            target_duration: DEFAULT_TARGET_DURATION_SECS,
            fit_policy: FitPolicy::FillCrop,
            caption_style: CaptionStyle::default(),
            encoding: EncodingConfig::default(),
            ffmpeg_timeout: Duration::from_secs(300),
            download_timeout: Duration::from_secs(120),
        }
    }
}

impl RenderConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut caption_style = defaults.caption_style;
        if let Ok(font) = std::env::var("QREEL_FONT_PATH") {
            caption_style = caption_style.with_font(font);
        }

        let fps = std::env::var("QREEL_FPS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|fps: &u32| *fps > 0)
            .unwrap_or(defaults.encoding.fps);

        Self {
            output_dir: std::env::var("QREEL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            work_dir: std::env::var("QREEL_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            target_size: defaults.target_size,
            target_duration: std::env::var("QREEL_TARGET_DURATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|d: &f64| d.is_finite() && *d > 0.0)
                .unwrap_or(defaults.target_duration),
            fit_policy: defaults.fit_policy,
            caption_style,
            encoding: defaults.encoding.with_fps(fps),
            ffmpeg_timeout: Duration::from_secs(
                std::env::var("QREEL_FFMPEG_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            download_timeout: Duration::from_secs(
                std::env::var("QREEL_DOWNLOAD_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }
}
