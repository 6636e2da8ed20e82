//! FFmpeg filter graph helpers.

use crate::geometry::Transform;

/// Escape a value embedded in a single-quoted filter option (paths, font files).
///
/// A quote cannot appear inside quotes, so it closes the quoted run, emits an
/// escaped quote and reopens.
pub fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
}

/// Video filter for one render: geometry, constant frame rate, then the caption on top.
///
/// Order matters: the caption chain comes last so it is drawn over the
/// geometry-corrected frame.
pub fn build_render_filter(transform: &Transform, fps: u32, caption_chain: Option<&str>) -> String {
    let mut chain = vec![transform.to_filter(), format!("fps={}", fps)];

    if let Some(caption) = caption_chain.filter(|c| !c.is_empty()) {
        chain.push(caption.to_string());
    }

    chain.push("format=yuv420p".to_string());
    chain.join(",")
}
