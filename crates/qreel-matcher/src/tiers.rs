//! Quality-tier selection from a provider's renditions.

use qreel_models::MediaSourceCandidate;

use crate::providers::{Definition, VideoAsset};

/// Default upper width for the standard tier.
pub const DEFAULT_STANDARD_WIDTH_CEILING: u32 = 1920;

/// Tunables for tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    /// Widest HD rendition still considered "standard"
    pub standard_width_ceiling: u32,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            standard_width_ceiling: DEFAULT_STANDARD_WIDTH_CEILING,
        }
    }
}

/// Pick high/standard/preview URLs from a hit's renditions.
///
/// - high: widest HD
/// - standard: narrowest HD within the width ceiling, else narrowest HD, else widest SD
/// - preview: narrowest SD, else narrowest HD
///
/// Missing tiers then borrow from each other (standard from high or preview,
/// high from standard). Returns `None` when there is no usable rendition.
/// Renditions of unknown width sort as the narrowest.
pub fn extract_tiers(assets: &[VideoAsset], policy: &TierPolicy) -> Option<MediaSourceCandidate> {
    let by_width_desc = |definition: Definition| {
        let mut matching: Vec<&VideoAsset> = assets
            .iter()
            .filter(|a| a.definition == definition && !a.url.trim().is_empty())
            .collect();
        matching.sort_by(|a, b| b.width.unwrap_or(0).cmp(&a.width.unwrap_or(0)));
        matching
    };

    let hd = by_width_desc(Definition::Hd);
    let sd = by_width_desc(Definition::Sd);

    let mut high = hd.first().map(|a| a.url.clone());

    let mut standard = hd
        .iter()
        .rev()
        .find(|a| a.width.unwrap_or(0) <= policy.standard_width_ceiling)
        .or_else(|| hd.last())
        .or_else(|| sd.first())
        .map(|a| a.url.clone());

    let preview = sd.last().or_else(|| hd.last()).map(|a| a.url.clone());

    if standard.is_none() {
        standard = high.clone().or_else(|| preview.clone());
    }
    if high.is_none() {
        high = standard.clone();
    }

    MediaSourceCandidate::from_tiers(high, standard, preview)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd(url: &str, width: u32) -> VideoAsset {
        VideoAsset::new(url, Definition::Hd, Some(width))
    }

    fn sd(url: &str, width: u32) -> VideoAsset {
        VideoAsset::new(url, Definition::Sd, Some(width))
    }

    #[test]
    fn test_full_ladder() {
        let assets = vec![
            sd("http://x/640.mp4", 640),
            hd("http://x/1280.mp4", 1280),
            hd("http://x/3840.mp4", 3840),
            sd("http://x/960.mp4", 960),
            hd("http://x/1920.mp4", 1920),
        ];
        let c = extract_tiers(&assets, &TierPolicy::default()).unwrap();
        assert_eq!(c.high_quality_url(), Some("http://x/3840.mp4"));
        assert_eq!(c.standard_url(), Some("http://x/1280.mp4"));
        assert_eq!(c.preview_url(), Some("http://x/640.mp4"));
    }

    #[test]
    fn test_only_medium_payload() {
        let assets = vec![hd("http://x/med.mp4", 1920)];
        let c = extract_tiers(&assets, &TierPolicy::default()).unwrap();
        assert_eq!(c.standard_url(), Some("http://x/med.mp4"));
        assert_eq!(c.high_quality_url(), Some("http://x/med.mp4"));
        assert_eq!(c.best_url(), "http://x/med.mp4");
    }

    #[test]
    fn test_empty_payload_has_no_candidate() {
        assert!(extract_tiers(&[], &TierPolicy::default()).is_none());
        assert!(extract_tiers(&[hd("  ", 1920)], &TierPolicy::default()).is_none());
    }

    #[test]
    fn test_all_hd_above_ceiling_uses_narrowest_hd() {
        let assets = vec![hd("http://x/2560.mp4", 2560), hd("http://x/3840.mp4", 3840)];
        let c = extract_tiers(&assets, &TierPolicy::default()).unwrap();
        assert_eq!(c.standard_url(), Some("http://x/2560.mp4"));
        assert_eq!(c.preview_url(), Some("http://x/2560.mp4"));
    }

    #[test]
    fn test_sd_only_fills_every_tier() {
        let assets = vec![sd("http://x/960.mp4", 960), sd("http://x/640.mp4", 640)];
        let c = extract_tiers(&assets, &TierPolicy::default()).unwrap();
        assert_eq!(c.standard_url(), Some("http://x/960.mp4"));
        assert_eq!(c.high_quality_url(), Some("http://x/960.mp4"));
        assert_eq!(c.preview_url(), Some("http://x/640.mp4"));
    }

    #[test]
    fn test_ceiling_is_tunable() {
        let assets = vec![hd("http://x/1280.mp4", 1280), hd("http://x/1920.mp4", 1920)];
        let strict = TierPolicy {
            standard_width_ceiling: 1000,
        };
        let c = extract_tiers(&assets, &strict).unwrap();
        // Nothing fits under 1000, so the narrowest HD is used.
        assert_eq!(c.standard_url(), Some("http://x/1280.mp4"));
    }
}
