//! Geometry normalization.
//!
//! Maps a source frame of arbitrary aspect ratio onto the fixed output frame.
//! Two policies are supported:
//!
//! - [`FitPolicy::Letterbox`]: the whole source stays visible, scaled to fit
//!   inside the target and centered on a black canvas.
//! - [`FitPolicy::FillCrop`]: the whole target is covered, scaled to cover and
//!   center-cropped on the overflowing axis.
//!
//! Everything here is pure arithmetic; [`Transform::to_filter`] renders the
//! result as an FFmpeg filter chain for the pipeline to apply.

use qreel_models::FrameSize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the source frame is mapped onto the target frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    /// Fit inside the target, pad with black bars
    Letterbox,
    /// Cover the target, crop the overflow
    FillCrop,
}

impl fmt::Display for FitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitPolicy::Letterbox => write!(f, "letterbox"),
            FitPolicy::FillCrop => write!(f, "fill_crop"),
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    /// Whether this rectangle lies entirely within a frame of `bounds`.
    pub fn fits_within(&self, bounds: FrameSize) -> bool {
        self.x as u64 + self.width as u64 <= bounds.width as u64
            && self.y as u64 + self.height as u64 <= bounds.height as u64
    }
}

/// Result of normalizing a source frame onto the target frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub policy: FitPolicy,
    /// Uniform scale factor applied to the source
    pub scale: f64,
    /// Source frame size
    pub source: FrameSize,
    /// Intermediate size after scaling
    pub scaled: FrameSize,
    /// Final frame size, always equal to the target
    pub output: FrameSize,
    /// Crop window within the scaled frame (fill-crop only, absent when nothing overflows)
    pub crop: Option<Rect>,
    /// Placement of the scaled frame on the canvas (letterbox only, absent when there are no bars)
    pub pad: Option<Rect>,
}

impl Transform {
    /// Region of the output frame that carries source pixels.
    pub fn content_box(&self) -> Rect {
        match self.pad {
            Some(pad) => pad,
            None => Rect::new(0, 0, self.output.width, self.output.height),
        }
    }

    /// Whether black bars are visible.
    pub fn has_bars(&self) -> bool {
        self.pad.is_some()
    }

    /// FFmpeg filter chain implementing this transform.
    pub fn to_filter(&self) -> String {
        let mut chain = vec![format!(
            "scale={}:{}:flags=bicubic",
            self.scaled.width, self.scaled.height
        )];

        if let Some(crop) = self.crop {
            chain.push(format!(
                "crop={}:{}:{}:{}",
                crop.width, crop.height, crop.x, crop.y
            ));
        }

        if let Some(pad) = self.pad {
            chain.push(format!(
                "pad={}:{}:{}:{}:color=black",
                self.output.width, self.output.height, pad.x, pad.y
            ));
        }

        chain.push("setsar=1".to_string());
        chain.join(",")
    }
}

/// Compute the transform mapping `source` onto `target` under `policy`.
///
/// # Panics
///
/// Panics if any dimension is zero.
pub fn normalize(source: FrameSize, target: FrameSize, policy: FitPolicy) -> Transform {
    assert!(
        source.is_valid() && target.is_valid(),
        "frame dimensions must be positive (source {source}, target {target})"
    );

    let scale_x = target.width as f64 / source.width as f64;
    let scale_y = target.height as f64 / source.height as f64;

    // Identical aspect ratios map straight onto the target, no bars and no crop.
    let same_aspect =
        source.width as u64 * target.height as u64 == target.width as u64 * source.height as u64;

    match policy {
        FitPolicy::Letterbox => {
            let scale = scale_x.min(scale_y);
            let scaled = if same_aspect {
                target
            } else {
                FrameSize::new(
                    scale_dim(source.width, scale).min(target.width),
                    scale_dim(source.height, scale).min(target.height),
                )
            };

            let pad = (scaled != target).then(|| {
                Rect::new(
                    (target.width - scaled.width) / 2,
                    (target.height - scaled.height) / 2,
                    scaled.width,
                    scaled.height,
                )
            });

            Transform {
                policy,
                scale,
                source,
                scaled,
                output: target,
                crop: None,
                pad,
            }
        }
        FitPolicy::FillCrop => {
            let scale = scale_x.max(scale_y);
            let scaled = if same_aspect {
                target
            } else {
                FrameSize::new(
                    scale_dim(source.width, scale).max(target.width),
                    scale_dim(source.height, scale).max(target.height),
                )
            };

            let crop = (scaled != target).then(|| {
                let max_x = scaled.width - target.width;
                let max_y = scaled.height - target.height;
                Rect::new(
                    (max_x / 2).min(max_x),
                    (max_y / 2).min(max_y),
                    target.width,
                    target.height,
                )
            });

            Transform {
                policy,
                scale,
                source,
                scaled,
                output: target,
                crop,
                pad: None,
            }
        }
    }
}

fn scale_dim(dim: u32, scale: f64) -> u32 {
    (dim as f64 * scale).round().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: FrameSize = FrameSize::new(1080, 1920);

    fn sources() -> Vec<FrameSize> {
        let mut sizes = vec![
            FrameSize::new(1920, 1080),
            FrameSize::new(1920, 800),
            FrameSize::new(3840, 2160),
            FrameSize::new(1080, 1920),
            FrameSize::new(540, 960),
            FrameSize::new(720, 1280),
            FrameSize::new(1000, 1000),
            FrameSize::new(1, 1),
            FrameSize::new(7, 3),
            FrameSize::new(640, 4000),
            FrameSize::new(1279, 719),
        ];
        for w in (16..4000).step_by(397) {
            for h in (16..4000).step_by(433) {
                sizes.push(FrameSize::new(w, h));
            }
        }
        sizes
    }

    #[test]
    fn test_fill_crop_always_exact_target() {
        for source in sources() {
            let t = normalize(source, TARGET, FitPolicy::FillCrop);
            assert_eq!(t.output, TARGET, "source {source}");
            assert!(t.scaled.width >= TARGET.width && t.scaled.height >= TARGET.height);
            assert!(t.pad.is_none());
            if let Some(crop) = t.crop {
                assert_eq!(crop.size(), TARGET);
                assert!(crop.fits_within(t.scaled), "crop out of bounds for {source}");
            } else {
                assert_eq!(t.scaled, TARGET);
            }
            assert_eq!(t.content_box(), Rect::new(0, 0, 1080, 1920));
        }
    }

    #[test]
    fn test_letterbox_preserves_aspect() {
        for source in sources() {
            let t = normalize(source, TARGET, FitPolicy::Letterbox);
            assert_eq!(t.output, TARGET, "source {source}");
            let content = t.content_box();
            assert!(content.fits_within(TARGET));

            // Content height predicted from its width (and vice versa) is within one pixel.
            let expected_h = content.width as f64 / source.aspect_ratio();
            let expected_w = content.height as f64 * source.aspect_ratio();
            let within = (content.height as f64 - expected_h).abs() <= 1.0
                || (content.width as f64 - expected_w).abs() <= 1.0;
            assert!(within, "aspect drift for {source}: content {:?}", content);
        }
    }

    #[test]
    fn test_letterbox_same_aspect_has_no_bars() {
        let t = normalize(FrameSize::new(540, 960), TARGET, FitPolicy::Letterbox);
        assert!(!t.has_bars());
        assert_eq!(t.scaled, TARGET);
        assert!((t.scale - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_letterbox_landscape_gets_top_bottom_bars() {
        let t = normalize(FrameSize::new(1920, 1080), TARGET, FitPolicy::Letterbox);
        assert_eq!(t.scaled, FrameSize::new(1080, 608));
        assert_eq!(t.pad, Some(Rect::new(0, 656, 1080, 608)));
        assert_eq!(
            t.to_filter(),
            "scale=1080:608:flags=bicubic,pad=1080:1920:0:656:color=black,setsar=1"
        );
    }

    #[test]
    fn test_fill_crop_ultrawide_source() {
        // 2.4:1 source onto 9:16: scale to cover height, crop width symmetrically.
        let t = normalize(FrameSize::new(1920, 800), TARGET, FitPolicy::FillCrop);
        assert!((t.scale - 2.4).abs() < 1e-9);
        assert_eq!(t.scaled, FrameSize::new(4608, 1920));
        let crop = t.crop.unwrap();
        assert_eq!(crop, Rect::new(1764, 0, 1080, 1920));
        assert_eq!(crop.x, t.scaled.width - crop.x - crop.width);
        assert_eq!(
            t.to_filter(),
            "scale=4608:1920:flags=bicubic,crop=1080:1920:1764:0,setsar=1"
        );
    }

    #[test]
    fn test_fill_crop_tall_source_crops_height() {
        let t = normalize(FrameSize::new(640, 4000), TARGET, FitPolicy::FillCrop);
        let crop = t.crop.unwrap();
        assert_eq!(crop.x, 0);
        assert!(crop.y > 0);
        assert_eq!(t.scaled.width, 1080);
    }

    #[test]
    #[should_panic(expected = "frame dimensions must be positive")]
    fn test_zero_dimension_panics() {
        normalize(FrameSize::new(0, 1080), TARGET, FitPolicy::FillCrop);
    }
}
