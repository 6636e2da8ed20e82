//! Frame dimensions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width and height of a video frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Default vertical output size (9:16).
pub const VERTICAL_1080P: FrameSize = FrameSize {
    width: 1080,
    height: 1920,
};

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Number of pixels in the frame.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        VERTICAL_1080P
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error parsing a `WIDTHxHEIGHT` string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid frame size '{0}', expected WIDTHxHEIGHT with positive values")]
pub struct FrameSizeError(pub String);

impl FromStr for FrameSize {
    type Err = FrameSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || FrameSizeError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let size = FrameSize::new(
            w.trim().parse().map_err(|_| err())?,
            h.trim().parse().map_err(|_| err())?,
        );
        if !size.is_valid() {
            return Err(err());
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_size() {
        assert_eq!("1080x1920".parse::<FrameSize>().unwrap(), VERTICAL_1080P);
        assert_eq!("1920X800".parse::<FrameSize>().unwrap(), FrameSize::new(1920, 800));
        assert!("0x1920".parse::<FrameSize>().is_err());
        assert!("1080".parse::<FrameSize>().is_err());
    }

    #[test]
    fn test_aspect_ratio() {
        assert!((VERTICAL_1080P.aspect_ratio() - 0.5625).abs() < 1e-9);
        assert!((FrameSize::new(1920, 800).aspect_ratio() - 2.4).abs() < 1e-9);
    }
}
