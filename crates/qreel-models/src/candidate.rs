//! Stock-footage candidate model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One provider's offer of a downloadable clip at up to three quality tiers.
///
/// A candidate always carries at least one URL: the only constructor,
/// [`MediaSourceCandidate::from_tiers`], refuses to build an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MediaSourceCandidate {
    high_quality_url: Option<String>,
    standard_url: Option<String>,
    preview_url: Option<String>,
}

impl MediaSourceCandidate {
    /// Build a candidate from the three tiers.
    ///
    /// Blank URLs count as missing. Returns `None` when no tier has a URL.
    pub fn from_tiers(
        high_quality: Option<String>,
        standard: Option<String>,
        preview: Option<String>,
    ) -> Option<Self> {
        let clean = |url: Option<String>| url.filter(|u| !u.trim().is_empty());

        let candidate = Self {
            high_quality_url: clean(high_quality),
            standard_url: clean(standard),
            preview_url: clean(preview),
        };

        if candidate.high_quality_url.is_none()
            && candidate.standard_url.is_none()
            && candidate.preview_url.is_none()
        {
            return None;
        }

        Some(candidate)
    }

    pub fn high_quality_url(&self) -> Option<&str> {
        self.high_quality_url.as_deref()
    }

    pub fn standard_url(&self) -> Option<&str> {
        self.standard_url.as_deref()
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    /// Best available URL for rendering: high quality, then standard, then preview.
    pub fn best_url(&self) -> &str {
        self.high_quality_url
            .as_deref()
            .or(self.standard_url.as_deref())
            .or(self.preview_url.as_deref())
            // from_tiers guarantees one of the three is present
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidate_rejected() {
        assert!(MediaSourceCandidate::from_tiers(None, None, None).is_none());
        assert!(MediaSourceCandidate::from_tiers(Some("".into()), Some("  ".into()), None).is_none());
    }

    #[test]
    fn test_best_url_prefers_high_quality() {
        let candidate = MediaSourceCandidate::from_tiers(
            Some("http://x/hd.mp4".into()),
            Some("http://x/sd.mp4".into()),
            None,
        )
        .unwrap();
        assert_eq!(candidate.best_url(), "http://x/hd.mp4");
    }

    #[test]
    fn test_best_url_falls_back_to_preview() {
        let candidate =
            MediaSourceCandidate::from_tiers(None, None, Some("http://x/tiny.mp4".into())).unwrap();
        assert_eq!(candidate.best_url(), "http://x/tiny.mp4");
        assert!(candidate.high_quality_url().is_none());
    }
}
