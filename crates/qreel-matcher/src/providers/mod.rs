//! Stock-footage provider contracts and their HTTP clients.

pub mod coverr;
pub mod pexels;
pub mod pixabay;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{MatchError, MatchResult};
use crate::matcher::MatchProvider;

pub use coverr::{CoverrClient, CoverrConfig};
pub use pexels::{PexelsClient, PexelsConfig};
pub use pixabay::{PixabayClient, PixabayConfig};

/// One node of a provider's category taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<Category>,
}

/// A video listed under a category, with its three download renditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryVideo {
    pub id: String,
    pub download_url: Option<String>,
    pub stream_url: Option<String>,
    pub preview_url: Option<String>,
}

/// Coarse resolution class of a video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Definition {
    Hd,
    Sd,
}

/// One downloadable rendition of a search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub url: String,
    pub definition: Definition,
    pub width: Option<u32>,
}

impl VideoAsset {
    pub fn new(url: impl Into<String>, definition: Definition, width: Option<u32>) -> Self {
        Self {
            url: url.into(),
            definition,
            width,
        }
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub assets: Vec<VideoAsset>,
}

/// Keyword search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub orientation: Option<String>,
    pub size: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            orientation: None,
            size: None,
            page: None,
            per_page: None,
        }
    }

    pub fn orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = Some(orientation.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

/// Provider that organises footage in a browsable taxonomy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryProvider: Send + Sync {
    fn kind(&self) -> MatchProvider;

    /// Top-level categories, each carrying its subcategories.
    async fn list_categories(&self) -> MatchResult<Vec<Category>>;

    async fn list_videos_for_category(&self, category_id: &str) -> MatchResult<Vec<CategoryVideo>>;
}

/// Provider with keyword search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSearchProvider: Send + Sync {
    fn kind(&self) -> MatchProvider;

    /// Hint appended to the query-generation prompt for this provider's search engine.
    fn query_hint(&self) -> &'static str;

    /// Hits in the provider's relevance order.
    async fn search_videos(&self, query: &SearchQuery) -> MatchResult<Vec<SearchHit>>;
}

/// Send a request and decode a JSON body, mapping failures onto [`MatchError`].
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> MatchResult<T> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MatchError::provider(
            provider,
            format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>()),
        ));
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| MatchError::provider(provider, format!("unexpected response body: {}", e)))
}

/// Treat a blank string as missing.
pub(crate) fn non_blank(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

/// Provider IDs arrive as either JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
