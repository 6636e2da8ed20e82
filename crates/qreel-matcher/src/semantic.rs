//! Keyword-search matching (Pexels, Pixabay).
//!
//! The generator condenses the quote into a short search query tailored to
//! the provider, the provider is searched once, and the first hit with a
//! usable rendition wins.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use qreel_models::MediaSourceCandidate;

use crate::error::{MatchError, MatchResult};
use crate::generation::{clean_reply, TextGenerator};
use crate::matcher::{search_context, ContentMatcher, MatchProvider};
use crate::providers::{SearchQuery, VideoSearchProvider};
use crate::tiers::{extract_tiers, TierPolicy};

/// Results requested per search.
pub const SEARCH_PAGE_SIZE: u32 = 5;

pub struct SemanticMatcher<P: VideoSearchProvider> {
    provider: P,
    generator: Arc<dyn TextGenerator>,
    policy: TierPolicy,
}

impl<P: VideoSearchProvider> SemanticMatcher<P> {
    pub fn new(provider: P, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            provider,
            generator,
            policy: TierPolicy::default(),
        }
    }

    pub fn with_tier_policy(mut self, policy: TierPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ask the generator for a search query.
    pub async fn search_query(&self, text: &str, topic: Option<&str>) -> MatchResult<String> {
        let prompt = build_query_prompt(&search_context(text, topic), self.provider.query_hint());
        let query = clean_reply(&self.generator.generate(&prompt).await?);
        if query.is_empty() {
            return Err(MatchError::generation("empty search query"));
        }
        Ok(query)
    }
}

fn build_query_prompt(context: &str, hint: &str) -> String {
    format!(
        "Turn the following text into a short stock-video search query that \
         describes footage matching its mood and theme.\n\
         Text: \"{context}\"\n\
         {hint}\n\
         Return only the search query, without quotes or explanation."
    )
}

#[async_trait]
impl<P: VideoSearchProvider> ContentMatcher for SemanticMatcher<P> {
    fn provider(&self) -> MatchProvider {
        self.provider.kind()
    }

    async fn find_candidate(&self, text: &str, topic: Option<&str>) -> MatchResult<MediaSourceCandidate> {
        let query = self.search_query(text, topic).await?;
        info!(provider = %self.provider.kind(), query = %query, "Generated search query");

        let request = SearchQuery::new(&query)
            .orientation("landscape")
            .size("medium")
            .per_page(SEARCH_PAGE_SIZE);
        let hits = self.provider.search_videos(&request).await?;

        for hit in &hits {
            if hit.assets.is_empty() {
                debug!(hit = %hit.id, "Hit has no renditions, skipping");
                continue;
            }
            if let Some(candidate) = extract_tiers(&hit.assets, &self.policy) {
                debug!(hit = %hit.id, "Using hit");
                return Ok(candidate);
            }
        }

        Err(MatchError::not_found(format!(
            "none of {} hits for '{}' has a usable video",
            hits.len(),
            query
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockTextGenerator;
    use crate::providers::{Definition, MockVideoSearchProvider, SearchHit, VideoAsset};

    fn generator(reply: &'static str) -> Arc<dyn TextGenerator> {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt| prompt.contains("Stay strong."))
            .returning(move |_| Ok(reply.to_string()));
        Arc::new(generator)
    }

    fn provider(hits: Vec<SearchHit>) -> MockVideoSearchProvider {
        let mut provider = MockVideoSearchProvider::new();
        provider.expect_kind().return_const(MatchProvider::Pexels);
        provider.expect_query_hint().return_const("hint");
        provider
            .expect_search_videos()
            .withf(|q| {
                q.query == "resilience mountain"
                    && q.orientation.as_deref() == Some("landscape")
                    && q.per_page == Some(SEARCH_PAGE_SIZE)
            })
            .times(1)
            .returning(move |_| Ok(hits.clone()));
        provider
    }

    #[tokio::test]
    async fn test_first_usable_hit_wins() {
        let hits = vec![
            SearchHit {
                id: "1".into(),
                assets: vec![],
            },
            SearchHit {
                id: "2".into(),
                assets: vec![VideoAsset::new("http://x/med.mp4", Definition::Hd, Some(1920))],
            },
            SearchHit {
                id: "3".into(),
                assets: vec![VideoAsset::new("http://x/other.mp4", Definition::Hd, Some(1920))],
            },
        ];

        let matcher = SemanticMatcher::new(provider(hits), generator("resilience mountain"));
        let candidate = matcher.match_quote("Stay strong.", None).await.unwrap();

        assert_eq!(candidate.standard_url(), Some("http://x/med.mp4"));
        assert_eq!(candidate.high_quality_url(), Some("http://x/med.mp4"));
    }

    #[tokio::test]
    async fn test_no_usable_hits_is_not_found() {
        let hits = vec![SearchHit {
            id: "1".into(),
            assets: vec![],
        }];
        let matcher = SemanticMatcher::new(provider(hits), generator("resilience mountain"));

        let err = matcher.find_candidate("Stay strong.", None).await.unwrap_err();
        assert!(matches!(err, MatchError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_query_skips_search() {
        let mut provider = MockVideoSearchProvider::new();
        provider.expect_query_hint().return_const("hint");
        provider.expect_search_videos().times(0);

        let matcher = SemanticMatcher::new(provider, generator("  \n "));
        let err = matcher.find_candidate("Stay strong.", None).await.unwrap_err();
        assert!(matches!(err, MatchError::Generation(_)));
    }

    #[test]
    fn test_prompt_carries_context_and_hint() {
        let prompt = build_query_prompt("courage quote: Stay strong.", "Use nouns.");
        assert!(prompt.contains("\"courage quote: Stay strong.\""));
        assert!(prompt.contains("Use nouns."));
    }
}
