//! Category-based matching (Coverr).
//!
//! The generator picks a category name from the provider's taxonomy, the name
//! is resolved back to an id, and one video of that category is chosen at
//! random.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::{debug, info};

use qreel_models::MediaSourceCandidate;

use crate::error::{MatchError, MatchResult};
use crate::generation::{clean_reply, TextGenerator};
use crate::matcher::{ContentMatcher, MatchProvider};
use crate::providers::{Category, CategoryProvider, CategoryVideo};

/// A category or subcategory, flattened out of the taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub id: String,
    pub name: String,
    pub tags: Vec<String>,
}

pub struct CategoricalMatcher<C: CategoryProvider> {
    provider: C,
    generator: Arc<dyn TextGenerator>,
}

impl<C: CategoryProvider> CategoricalMatcher<C> {
    pub fn new(provider: C, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            provider,
            generator,
        }
    }
}

/// Categories followed by their subcategories, depth first.
pub fn flatten_categories(categories: &[Category]) -> Vec<CategoryEntry> {
    let mut entries = Vec::new();
    for category in categories {
        entries.push(CategoryEntry {
            id: category.id.clone(),
            name: category.name.clone(),
            tags: category.tags.clone(),
        });
        entries.extend(flatten_categories(&category.subcategories));
    }
    entries
}

/// Resolve the generator's reply to a category id.
///
/// An exact case-insensitive name match wins; otherwise the first entry whose
/// name or any tag contains the reply.
pub fn resolve_category<'a>(reply: &str, entries: &'a [CategoryEntry]) -> Option<&'a CategoryEntry> {
    let wanted = reply.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    entries
        .iter()
        .find(|e| e.name.to_lowercase() == wanted)
        .or_else(|| {
            entries.iter().find(|e| {
                e.name.to_lowercase().contains(&wanted)
                    || e.tags.iter().any(|t| t.to_lowercase().contains(&wanted))
            })
        })
}

fn build_category_prompt(context: &str, entries: &[CategoryEntry]) -> String {
    let listing = entries
        .iter()
        .map(|e| {
            if e.tags.is_empty() {
                format!("- {}", e.name)
            } else {
                format!("- {} (tags: {})", e.name, e.tags.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Quote: \"{context}\"\n\
         Task: Match this quote with one of these video categories.\n\
         Categories:\n{listing}\n\n\
         Instructions: Analyze the quote's theme and emotion. \
         Return only the category name that best matches, nothing else."
    )
}

fn to_candidate(video: &CategoryVideo) -> Option<MediaSourceCandidate> {
    MediaSourceCandidate::from_tiers(
        video.download_url.clone(),
        video.stream_url.clone(),
        video.preview_url.clone(),
    )
}

#[async_trait]
impl<C: CategoryProvider> ContentMatcher for CategoricalMatcher<C> {
    fn provider(&self) -> MatchProvider {
        self.provider.kind()
    }

    async fn find_candidate(&self, text: &str, topic: Option<&str>) -> MatchResult<MediaSourceCandidate> {
        let entries = flatten_categories(&self.provider.list_categories().await?);
        if entries.is_empty() {
            return Err(MatchError::not_found("provider returned no categories"));
        }
        debug!(count = entries.len(), "Flattened categories");

        let context = crate::matcher::search_context(text, topic);
        let reply = clean_reply(&self.generator.generate(&build_category_prompt(&context, &entries)).await?);
        if reply.is_empty() {
            return Err(MatchError::generation("no category name in reply"));
        }
        info!(category = %reply, "Generator picked category");

        let entry = resolve_category(&reply, &entries)
            .ok_or_else(|| MatchError::not_found(format!("no category matches '{}'", reply)))?;

        let videos = self.provider.list_videos_for_category(&entry.id).await?;
        let usable: Vec<MediaSourceCandidate> = videos.iter().filter_map(to_candidate).collect();

        let picked = {
            let mut rng = rand::rng();
            usable.choose(&mut rng).cloned()
        };

        picked.ok_or_else(|| {
            MatchError::not_found(format!(
                "category '{}' has no downloadable videos ({} listed)",
                entry.name,
                videos.len()
            ))
        })
    }
}
