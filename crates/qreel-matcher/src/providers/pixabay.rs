//! Pixabay video search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{get_json, non_blank, string_or_number, Definition, SearchHit, SearchQuery, VideoAsset, VideoSearchProvider};
use crate::error::{MatchError, MatchResult};
use crate::matcher::MatchProvider;

pub const DEFAULT_PIXABAY_URL: &str = "https://pixabay.com";

#[derive(Debug, Clone)]
pub struct PixabayConfig {
    pub api_key: String,
    pub base_url: String,
    /// Search language
    pub language: String,
    /// `film`, `animation` or `all`
    pub video_type: String,
    pub timeout: Duration,
}

impl PixabayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_PIXABAY_URL.to_string(),
            language: "en".to_string(),
            video_type: "film".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create config from `PIXABAY_API_KEY` and `PIXABAY_API_URL`.
    pub fn from_env() -> MatchResult<Self> {
        let api_key = std::env::var("PIXABAY_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MatchError::config("PIXABAY_API_KEY not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("PIXABAY_API_URL") {
            config.base_url = url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
struct PixabayHit {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    videos: Option<Renditions>,
}

#[derive(Debug, Default, Deserialize)]
struct Renditions {
    large: Option<Rendition>,
    medium: Option<Rendition>,
    small: Option<Rendition>,
    tiny: Option<Rendition>,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    url: Option<String>,
    width: Option<u32>,
}

impl Renditions {
    /// `large` and `medium` count as HD, `small` and `tiny` as SD.
    fn into_assets(self) -> Vec<VideoAsset> {
        [
            (self.large, Definition::Hd),
            (self.medium, Definition::Hd),
            (self.small, Definition::Sd),
            (self.tiny, Definition::Sd),
        ]
        .into_iter()
        .filter_map(|(rendition, definition)| {
            let rendition = rendition?;
            let width = rendition.width.filter(|w| *w > 0);
            Some(VideoAsset::new(non_blank(rendition.url)?, definition, width))
        })
        .collect()
    }
}

pub struct PixabayClient {
    config: PixabayConfig,
    client: Client,
}

impl PixabayClient {
    pub fn new(config: PixabayConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: PixabayConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl VideoSearchProvider for PixabayClient {
    fn kind(&self) -> MatchProvider {
        MatchProvider::Pixabay
    }

    fn query_hint(&self) -> &'static str {
        "Pixabay matches on tags, so use at most three plain English keywords, for example \"forest fog morning\"."
    }

    /// Pixabay has no orientation or size filter; those fields are ignored.
    async fn search_videos(&self, query: &SearchQuery) -> MatchResult<Vec<SearchHit>> {
        let mut params = vec![
            ("key", self.config.api_key.clone()),
            ("q", query.query.clone()),
            ("lang", self.config.language.clone()),
            ("video_type", self.config.video_type.clone()),
            ("safesearch", "true".to_string()),
        ];
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = query.per_page {
            // Pixabay rejects pages smaller than 3
            params.push(("per_page", per_page.clamp(3, 200).to_string()));
        }

        let request = self
            .client
            .get(format!("{}/api/videos/", self.config.base_url.trim_end_matches('/')))
            .query(&params)
            .timeout(self.config.timeout);

        let response: SearchResponse = get_json("pixabay", request).await?;

        Ok(response
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                id: hit.id,
                assets: hit.videos.map(Renditions::into_assets).unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_maps_renditions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/videos/"))
            .and(query_param("key", "pix"))
            .and(query_param("q", "forest fog"))
            .and(query_param("video_type", "film"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 2,
                "hits": [
                    {"id": 1},
                    {"id": 2, "videos": {
                        "large": {"url": "", "width": 0},
                        "medium": {"url": "http://x/med.mp4", "width": 1920},
                        "small": {"url": "http://x/small.mp4", "width": 1280},
                        "tiny": {"url": "http://x/tiny.mp4", "width": 640}
                    }}
                ]
            })))
            .mount(&server)
            .await;

        let client = PixabayClient::new(PixabayConfig::new("pix").with_base_url(server.uri()));
        let hits = client
            .search_videos(&SearchQuery::new("forest fog").per_page(5))
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert!(hits[0].assets.is_empty());
        assert_eq!(
            hits[1].assets,
            vec![
                VideoAsset::new("http://x/med.mp4", Definition::Hd, Some(1920)),
                VideoAsset::new("http://x/small.mp4", Definition::Sd, Some(1280)),
                VideoAsset::new("http://x/tiny.mp4", Definition::Sd, Some(640)),
            ]
        );
    }
}
