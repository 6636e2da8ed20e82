//! Caption text measurement from the actual font file.

use std::path::Path;

use fontdue::{Font, FontSettings};
use qreel_models::CaptionStyle;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Measures rendered line widths for one font at one pixel size.
pub struct TextMeasurer {
    font: Font,
    px: f32,
    /// Outline drawn on both sides of every glyph
    stroke: u32,
}

impl TextMeasurer {
    /// Load the caption font named by `style`.
    pub async fn load(style: &CaptionStyle) -> MediaResult<Self> {
        let bytes = fs::read(&style.font_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::FileNotFound(style.font_path.clone())
            } else {
                MediaError::from(e)
            }
        })?;
        Self::from_bytes(&bytes, style, &style.font_path)
    }

    /// Parse font data already in memory. `origin` only appears in errors.
    pub fn from_bytes(bytes: &[u8], style: &CaptionStyle, origin: &Path) -> MediaResult<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
            MediaError::invalid_input(format!("unreadable font {}: {}", origin.display(), e))
        })?;

        Ok(Self {
            font,
            px: style.font_size as f32,
            stroke: style.stroke_width,
        })
    }

    /// Horizontal extent of `text` in pixels, outline included.
    ///
    /// Covers both the pen advance and any glyph ink that overhangs it.
    pub fn line_width(&self, text: &str) -> u32 {
        let mut pen = 0.0f32;
        let mut left = 0.0f32;
        let mut right = 0.0f32;
        let mut previous: Option<char> = None;

        for c in text.chars() {
            if let Some(kern) = previous.and_then(|p| self.font.horizontal_kern(p, c, self.px)) {
                pen += kern;
            }

            let metrics = self.font.metrics(c, self.px);
            if metrics.width > 0 {
                let ink_left = pen + metrics.xmin as f32;
                left = left.min(ink_left);
                right = right.max(ink_left + metrics.width as f32);
            }

            pen += metrics.advance_width;
            right = right.max(pen);
            previous = Some(c);
        }

        if text.is_empty() {
            return 0;
        }

        (right - left).ceil() as u32 + 2 * self.stroke
    }
}
