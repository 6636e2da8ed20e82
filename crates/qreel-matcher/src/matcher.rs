//! The content-matching contract shared by every strategy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use qreel_models::MediaSourceCandidate;

use crate::error::MatchResult;
use crate::metrics;

/// Stock-footage provider behind a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchProvider {
    Coverr,
    Pexels,
    Pixabay,
}

impl MatchProvider {
    pub const ALL: [MatchProvider; 3] = [MatchProvider::Coverr, MatchProvider::Pexels, MatchProvider::Pixabay];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchProvider::Coverr => "coverr",
            MatchProvider::Pexels => "pexels",
            MatchProvider::Pixabay => "pixabay",
        }
    }
}

impl fmt::Display for MatchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coverr" => Ok(MatchProvider::Coverr),
            // The Pexels integration has historically been configured as "pixels"
            "pexels" | "pixels" => Ok(MatchProvider::Pexels),
            "pixabay" => Ok(MatchProvider::Pixabay),
            other => Err(format!(
                "unknown provider '{}', expected one of: coverr, pexels, pixabay",
                other
            )),
        }
    }
}

/// Turns quote text into one playable stock-footage candidate.
#[async_trait]
pub trait ContentMatcher: Send + Sync {
    fn provider(&self) -> MatchProvider;

    /// Find a candidate, reporting why none was found.
    async fn find_candidate(&self, text: &str, topic: Option<&str>) -> MatchResult<MediaSourceCandidate>;

    /// Find a candidate; any failure is logged and reported as `None`. Never retries.
    async fn match_quote(&self, text: &str, topic: Option<&str>) -> Option<MediaSourceCandidate> {
        let provider = self.provider();
        match self.find_candidate(text, topic).await {
            Ok(candidate) => {
                metrics::record_match(provider.as_str(), "success");
                info!(provider = %provider, url = candidate.best_url(), "Matched footage");
                Some(candidate)
            }
            Err(e) => {
                metrics::record_match(provider.as_str(), e.kind());
                warn!(provider = %provider, error = %e, "No footage matched");
                None
            }
        }
    }
}

/// Text handed to the generator: the quote, prefixed by its topic when present.
pub(crate) fn search_context(text: &str, topic: Option<&str>) -> String {
    match topic.map(str::trim).filter(|t| !t.is_empty()) {
        Some(topic) => format!("{} quote: {}", topic, text.trim()),
        None => text.trim().to_string(),
    }
}
