//! Caption styling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default caption font.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
/// Default caption font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 70;
/// Default stroke width in pixels.
pub const DEFAULT_STROKE_WIDTH: u32 = 2;
/// Total horizontal margin subtracted from the frame width when wrapping.
pub const DEFAULT_HORIZONTAL_MARGIN: u32 = 100;

/// Fixed visual style of the quote caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionStyle {
    /// TrueType font file
    pub font_path: PathBuf,
    /// Font size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Fill colour (FFmpeg colour syntax)
    #[serde(default = "default_fill")]
    pub fill_color: String,
    /// Outline colour
    #[serde(default = "default_stroke")]
    pub stroke_color: String,
    /// Outline width in pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    /// Total horizontal margin (split evenly left/right)
    #[serde(default = "default_margin")]
    pub horizontal_margin: u32,
    /// Line height as a multiple of the font size
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}
fn default_fill() -> String {
    "white".to_string()
}
fn default_stroke() -> String {
    "black".to_string()
}
fn default_stroke_width() -> u32 {
    DEFAULT_STROKE_WIDTH
}
fn default_margin() -> u32 {
    DEFAULT_HORIZONTAL_MARGIN
}
fn default_line_spacing() -> f32 {
    1.25
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: DEFAULT_FONT_SIZE,
            fill_color: default_fill(),
            stroke_color: default_stroke(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            horizontal_margin: DEFAULT_HORIZONTAL_MARGIN,
            line_spacing: default_line_spacing(),
        }
    }
}

impl CaptionStyle {
    /// Use a different font file.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = path.into();
        self
    }

    /// Line height in pixels.
    pub fn line_height(&self) -> u32 {
        (self.font_size as f32 * self.line_spacing).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = CaptionStyle::default();
        assert_eq!(style.font_size, 70);
        assert_eq!(style.stroke_width, 2);
        assert_eq!(style.fill_color, "white");
        assert_eq!(style.stroke_color, "black");
        assert_eq!(style.line_height(), 88);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let style: CaptionStyle =
            serde_json::from_str(r#"{"font_path": "/fonts/Inter.ttf", "font_size": 64}"#).unwrap();
        assert_eq!(style.font_size, 64);
        assert_eq!(style.horizontal_margin, DEFAULT_HORIZONTAL_MARGIN);
        assert_eq!(style.stroke_color, "black");
    }
}
