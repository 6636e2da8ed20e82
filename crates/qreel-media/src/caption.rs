//! Quote caption overlay.
//!
//! The caption is the quoted text, a blank line and an em-dash author line,
//! word-wrapped to the frame width minus a fixed margin and centered on the
//! frame for the whole clip. Each line is drawn by its own `drawtext` filter
//! reading from a text file, so quote text never has to be escaped into the
//! filter graph.

use std::path::{Path, PathBuf};

use qreel_models::{CaptionStyle, FrameSize};
use tokio::fs;

use crate::error::MediaResult;
use crate::filters::escape_filter_value;
use crate::font::TextMeasurer;

/// A static, styled caption ready to be composited over a video.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionOverlay {
    /// Wrapped lines, blank lines included
    pub lines: Vec<String>,
    /// Visible lifetime in seconds
    pub duration: f64,
    /// Frame the caption is centered on
    pub frame: FrameSize,
    pub style: CaptionStyle,
}

/// Build the caption overlay for a quote, wrapping with `measurer`'s font metrics.
pub fn render(
    text: &str,
    author: &str,
    duration: f64,
    frame: FrameSize,
    style: &CaptionStyle,
    measurer: &TextMeasurer,
) -> CaptionOverlay {
    let display = format_caption_text(text, author);
    let max_width = frame.width.saturating_sub(style.horizontal_margin);

    CaptionOverlay {
        lines: wrap_caption(&display, max_width, measurer),
        duration,
        frame,
        style: style.clone(),
    }
}

/// Quote text in quotation marks, a blank line, then the author line.
pub fn format_caption_text(text: &str, author: &str) -> String {
    format!("\u{201c}{}\u{201d}\n\n\u{2014} {}", text.trim(), author.trim())
}

/// Greedy word wrap to `max_width` rendered pixels.
///
/// Existing newlines are kept; a word wider than the box gets a line of its own.
pub fn wrap_caption(text: &str, max_width: u32, measurer: &TextMeasurer) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if measurer.line_width(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        lines.push(current);
    }

    lines
}

impl CaptionOverlay {
    /// Total height of the text block in pixels.
    pub fn block_height(&self) -> u32 {
        self.style.line_height() * self.lines.len() as u32
    }

    /// Vertical offset of the first line so the block is centered.
    pub fn top_offset(&self) -> i64 {
        (self.frame.height as i64 - self.block_height() as i64) / 2
    }

    /// Write one text file per non-empty line into `dir`.
    ///
    /// Returns `(line_index, path)` pairs for [`CaptionOverlay::drawtext_chain`].
    pub async fn materialize(&self, dir: &Path) -> MediaResult<Vec<(usize, PathBuf)>> {
        let mut files = Vec::new();

        for (index, line) in self.lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let path = dir.join(format!("caption_line_{:02}.txt", index));
            fs::write(&path, line.as_bytes()).await?;
            files.push((index, path));
        }

        Ok(files)
    }

    /// FFmpeg `drawtext` chain drawing the materialized lines.
    pub fn drawtext_chain(&self, files: &[(usize, PathBuf)]) -> String {
        let font = escape_filter_value(&self.style.font_path.to_string_lossy());
        let line_height = self.style.line_height() as i64;
        let top = self.top_offset();

        files
            .iter()
            .map(|(index, path)| {
                let y = top + *index as i64 * line_height;
                format!(
                    "drawtext=fontfile='{font}':textfile='{file}':expansion=none:\
                     fontsize={size}:fontcolor={fill}:borderw={stroke}:bordercolor={stroke_color}:\
                     x=(w-text_w)/2:y={y}:enable='between(t,0,{duration:.3})'",
                    font = font,
                    file = escape_filter_value(&path.to_string_lossy()),
                    size = self.style.font_size,
                    fill = self.style.fill_color,
                    stroke = self.style.stroke_width,
                    stroke_color = self.style.stroke_color,
                    y = y,
                    duration = self.duration,
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}
