//! Pexels video search client.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{get_json, non_blank, string_or_number, Definition, SearchHit, SearchQuery, VideoAsset, VideoSearchProvider};
use crate::error::{MatchError, MatchResult};
use crate::matcher::MatchProvider;

pub const DEFAULT_PEXELS_URL: &str = "https://api.pexels.com";

#[derive(Debug, Clone)]
pub struct PexelsConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl PexelsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_PEXELS_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create config from `PEXELS_API_KEY` and `PEXELS_API_URL`.
    pub fn from_env() -> MatchResult<Self> {
        let api_key = std::env::var("PEXELS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MatchError::config("PEXELS_API_KEY not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("PEXELS_API_URL") {
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
    videos: Vec<PexelsVideo>,
}

#[derive(Debug, Deserialize)]
struct PexelsVideo {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    video_files: Vec<PexelsFile>,
}

#[derive(Debug, Deserialize)]
struct PexelsFile {
    quality: Option<String>,
    width: Option<u32>,
    link: Option<String>,
}

impl PexelsFile {
    /// Only `hd` and `sd` files are tiered.
    fn into_asset(self) -> Option<VideoAsset> {
        let definition = match self.quality.as_deref()? {
            "hd" => Definition::Hd,
            "sd" => Definition::Sd,
            _ => return None,
        };
        Some(VideoAsset::new(non_blank(self.link)?, definition, self.width))
    }
}

pub struct PexelsClient {
    config: PexelsConfig,
    client: Client,
}

impl PexelsClient {
    pub fn new(config: PexelsConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: PexelsConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl VideoSearchProvider for PexelsClient {
    fn kind(&self) -> MatchProvider {
        MatchProvider::Pexels
    }

    fn query_hint(&self) -> &'static str {
        "Pexels works best with two or three concrete visual nouns, for example \"sunrise mountain lake\"."
    }

    async fn search_videos(&self, query: &SearchQuery) -> MatchResult<Vec<SearchHit>> {
        let mut params = vec![("query", query.query.clone())];
        if let Some(orientation) = &query.orientation {
            params.push(("orientation", orientation.clone()));
        }
        if let Some(size) = &query.size {
            params.push(("size", size.clone()));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = query.per_page {
            params.push(("per_page", per_page.to_string()));
        }

        let request = self
            .client
            .get(format!("{}/videos/search", self.config.base_url.trim_end_matches('/')))
            .header(AUTHORIZATION, &self.config.api_key)
            .query(&params)
            .timeout(self.config.timeout);

        let response: SearchResponse = get_json("pexels", request).await?;

        Ok(response
            .videos
            .into_iter()
            .map(|video| SearchHit {
                id: video.id,
                assets: video
                    .video_files
                    .into_iter()
                    .filter_map(PexelsFile::into_asset)
                    .collect(),
            })
            .collect())
    }
}
