//! Quote video service.
//!
//! This crate provides:
//! - Environment configuration for the whole application
//! - Tracing initialisation
//! - [`QuoteReelService`], which matches footage and hands it to the render pipeline

pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use config::AppConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::init_tracing;
pub use service::{build_generator, build_matcher, generate_quote, list_videos, QuoteReelService, VideoListing};
