//! Shared data models for the QReel quote video generator.
//!
//! This crate provides Serde-serializable types for:
//! - Quotes and their optional topic
//! - Stock-footage candidates offered at up to three quality tiers
//! - Render requests, voice-over selection and rendered outputs
//! - Caption styling and encoding configuration

pub mod candidate;
pub mod caption;
pub mod encoding;
pub mod frame;
pub mod quote;
pub mod render;

// Re-export common types
pub use candidate::MediaSourceCandidate;
pub use caption::CaptionStyle;
pub use encoding::EncodingConfig;
pub use frame::{FrameSize, FrameSizeError, VERTICAL_1080P};
pub use quote::{Quote, QUOTE_TOPICS};
pub use render::{RenderId, RenderSpec, RenderedVideo, VoiceSpec, DEFAULT_TARGET_DURATION_SECS};
