//! FFmpeg-based assembly of vertical quote videos.
//!
//! This crate provides:
//! - Pure geometry and duration planning (fill-crop/letterbox, trim/loop)
//! - Caption layout rendered as `drawtext` filters
//! - Type-safe FFmpeg command building with progress parsing and timeouts
//! - Source download, ffprobe metadata and optional speech synthesis
//! - The render pipeline tying these together with scoped cleanup

pub mod caption;
pub mod command;
pub mod config;
pub mod download;
pub mod duration;
pub mod error;
pub mod filters;
pub mod font;
pub mod fs_utils;
pub mod geometry;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod speech;

pub use caption::CaptionOverlay;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use config::RenderConfig;
pub use download::download_source;
pub use duration::{fit, try_fit, DurationAction, DurationPlan};
pub use error::{MediaError, MediaResult};
pub use font::TextMeasurer;
pub use fs_utils::{move_file, ScratchSpace};
pub use geometry::{normalize, FitPolicy, Rect, Transform};
pub use logging::RenderLogger;
pub use pipeline::{output_file_name, RenderPipeline, RenderStep};
pub use probe::{probe_video, VideoInfo};
pub use progress::FfmpegProgress;
pub use speech::{EdgeTtsSynthesizer, SpeechSynthesizer};
