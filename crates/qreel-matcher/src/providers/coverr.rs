//! Coverr category API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{get_json, non_blank, string_or_number, Category, CategoryProvider, CategoryVideo};
use crate::error::{MatchError, MatchResult};
use crate::matcher::MatchProvider;

pub const DEFAULT_COVERR_URL: &str = "https://api.coverr.co";

#[derive(Debug, Clone)]
pub struct CoverrConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl CoverrConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_COVERR_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create config from `COVERR_API_KEY` and `COVERR_API_URL`.
    pub fn from_env() -> MatchResult<Self> {
        let api_key = std::env::var("COVERR_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MatchError::config("COVERR_API_KEY not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("COVERR_API_URL") {
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
struct CategoriesResponse {
    #[serde(default)]
    hits: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    hits: Vec<CoverrVideo>,
}

#[derive(Debug, Deserialize)]
struct CoverrVideo {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    urls: Option<CoverrUrls>,
}

#[derive(Debug, Default, Deserialize)]
struct CoverrUrls {
    mp4_download: Option<String>,
    mp4: Option<String>,
    mp4_preview: Option<String>,
}

pub struct CoverrClient {
    config: CoverrConfig,
    client: Client,
}

impl CoverrClient {
    pub fn new(config: CoverrConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: CoverrConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn get(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        self.client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
    }
}

#[async_trait]
impl CategoryProvider for CoverrClient {
    fn kind(&self) -> MatchProvider {
        MatchProvider::Coverr
    }

    async fn list_categories(&self) -> MatchResult<Vec<Category>> {
        let response: CategoriesResponse = get_json("coverr", self.get("categories")).await?;
        debug!(count = response.hits.len(), "Coverr categories");
        Ok(response.hits)
    }

    async fn list_videos_for_category(&self, category_id: &str) -> MatchResult<Vec<CategoryVideo>> {
        let request = self
            .get(&format!("categories/{}/videos", category_id))
            .query(&[("urls", "true")]);
        let response: VideosResponse = get_json("coverr", request).await?;

        Ok(response
            .hits
            .into_iter()
            .map(|video| {
                let urls = video.urls.unwrap_or_default();
                CategoryVideo {
                    id: video.id,
                    download_url: non_blank(urls.mp4_download),
                    stream_url: non_blank(urls.mp4),
                    preview_url: non_blank(urls.mp4_preview),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lists_videos_with_urls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/nature-1/videos"))
            .and(query_param("urls", "true"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hits": [
                    {"id": "v1", "urls": {"mp4_download": "http://x/hq.mp4", "mp4": "http://x/std.mp4", "mp4_preview": ""}},
                    {"id": 2}
                ]
            })))
            .mount(&server)
            .await;

        let client = CoverrClient::new(CoverrConfig::new("secret").with_base_url(server.uri()));
        let videos = client.list_videos_for_category("nature-1").await.unwrap();

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].download_url.as_deref(), Some("http://x/hq.mp4"));
        assert_eq!(videos[0].preview_url, None);
        assert_eq!(videos[1].id, "2");
        assert_eq!(videos[1].stream_url, None);
    }

    #[tokio::test]
    async fn test_http_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = CoverrClient::new(CoverrConfig::new("nope").with_base_url(server.uri()));
        let err = client.list_categories().await.unwrap_err();

        assert!(matches!(err, MatchError::Provider { ref provider, .. } if provider == "coverr"));
    }
}
