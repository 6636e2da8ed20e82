//! Render metrics.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const RENDERS_TOTAL: &str = "qreel_renders_total";
    pub const RENDER_DURATION_SECONDS: &str = "qreel_render_duration_seconds";
    pub const DOWNLOAD_DURATION_SECONDS: &str = "qreel_download_duration_seconds";
}

/// Record a finished render. `outcome` is `success` or an error kind.
pub fn record_render(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::RENDERS_TOTAL, &labels).increment(1);
    histogram!(names::RENDER_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record how long a source download took.
pub fn record_download_duration(duration_secs: f64) {
    histogram!(names::DOWNLOAD_DURATION_SECONDS).record(duration_secs);
}
