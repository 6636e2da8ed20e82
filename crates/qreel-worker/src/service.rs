//! Quote → footage → video.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use qreel_matcher::{
    CategoricalMatcher, ContentMatcher, CoverrClient, CoverrConfig, GeminiClient, GeminiConfig,
    MatchProvider, PexelsClient, PexelsConfig, PixabayClient, PixabayConfig, QuoteGenerator,
    SemanticMatcher, TextGenerator,
};
use qreel_media::{EdgeTtsSynthesizer, RenderPipeline, SpeechSynthesizer};
use qreel_models::{MediaSourceCandidate, Quote, RenderSpec, RenderedVideo, VoiceSpec};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{WorkerError, WorkerResult};

/// Gemini client from `GEMINI_*` environment variables.
pub fn build_generator(http: reqwest::Client) -> WorkerResult<Arc<dyn TextGenerator>> {
    let config = GeminiConfig::from_env()?;
    Ok(Arc::new(GeminiClient::with_client(config, http)))
}

/// Matcher for `provider`, reading that provider's credentials from the environment.
///
/// A missing API key is a [`WorkerError::Config`].
pub fn build_matcher(
    provider: MatchProvider,
    generator: Arc<dyn TextGenerator>,
    http: reqwest::Client,
) -> WorkerResult<Arc<dyn ContentMatcher>> {
    let matcher: Arc<dyn ContentMatcher> = match provider {
        MatchProvider::Coverr => Arc::new(CategoricalMatcher::new(
            CoverrClient::with_client(CoverrConfig::from_env()?, http),
            generator,
        )),
        MatchProvider::Pexels => Arc::new(SemanticMatcher::new(
            PexelsClient::with_client(PexelsConfig::from_env()?, http),
            generator,
        )),
        MatchProvider::Pixabay => Arc::new(SemanticMatcher::new(
            PixabayClient::with_client(PixabayConfig::from_env()?, http),
            generator,
        )),
    };
    debug!(provider = %provider, "Built content matcher");
    Ok(matcher)
}

/// Chains footage matching into the render pipeline.
pub struct QuoteReelService {
    matcher: Arc<dyn ContentMatcher>,
    pipeline: RenderPipeline,
}

impl QuoteReelService {
    pub fn new(matcher: Arc<dyn ContentMatcher>, pipeline: RenderPipeline) -> Self {
        Self { matcher, pipeline }
    }

    /// Wire the Gemini client, the configured provider and edge-tts narration.
    pub fn from_config(config: &AppConfig, generator: Arc<dyn TextGenerator>) -> WorkerResult<Self> {
        let http = reqwest::Client::new();
        let matcher = build_matcher(config.provider, generator, http.clone())?;
        let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(EdgeTtsSynthesizer::new());
        let pipeline = RenderPipeline::new(config.render.clone(), http, Some(synthesizer));
        Ok(Self::new(matcher, pipeline))
    }

    pub fn provider(&self) -> MatchProvider {
        self.matcher.provider()
    }

    /// Find footage for a quote.
    pub async fn find_footage(&self, quote: &Quote) -> WorkerResult<MediaSourceCandidate> {
        self.matcher
            .match_quote(&quote.text, quote.topic.as_deref())
            .await
            .ok_or_else(|| {
                WorkerError::no_match(format!(
                    "{} found no footage for \"{}\"",
                    self.matcher.provider(),
                    quote.text
                ))
            })
    }

    /// Match footage and render the quote over it.
    ///
    /// Nothing is rendered when matching fails.
    pub async fn render(
        &self,
        quote: Quote,
        voice: Option<VoiceSpec>,
        duration: Option<f64>,
    ) -> WorkerResult<RenderedVideo> {
        let candidate = self.find_footage(&quote).await?;
        let config = self.pipeline.config();

        let mut spec = RenderSpec::new(quote, candidate.best_url())
            .with_size(config.target_size)
            .with_duration(duration.unwrap_or(config.target_duration));
        if let Some(voice) = voice {
            spec = spec.with_voice(voice);
        }

        let video = self.pipeline.render(&spec).await?;
        info!(path = %video.path.display(), "Quote video ready");
        Ok(video)
    }
}

/// Generate a quote with the given generator.
pub async fn generate_quote(generator: Arc<dyn TextGenerator>, topic: Option<&str>) -> WorkerResult<Quote> {
    Ok(QuoteGenerator::new(generator).generate(topic).await?)
}

/// A rendered video found in the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct VideoListing {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

/// MP4 files in `dir`, newest first. A missing directory lists nothing.
pub async fn list_videos(dir: &Path) -> WorkerResult<Vec<VideoListing>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut videos = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_mp4 = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("mp4"))
            .unwrap_or(false);
        if !is_mp4 {
            continue;
        }

        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }

        videos.push(VideoListing {
            file_name: entry.file_name().to_string_lossy().to_string(),
            path,
            size_bytes: metadata.len(),
            modified: metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now()),
        });
    }

    videos.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.file_name.cmp(&b.file_name)));
    Ok(videos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stub::StaticMatcher;
    use qreel_media::{MediaError, RenderConfig};
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    mod stub {
        use qreel_matcher::{ContentMatcher, MatchError, MatchProvider, MatchResult};
        use qreel_models::MediaSourceCandidate;
        use std::sync::atomic::{AtomicUsize, Ordering};

        /// Matcher that always answers with the same candidate.
        pub struct StaticMatcher {
            pub candidate: Option<MediaSourceCandidate>,
            pub calls: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl ContentMatcher for StaticMatcher {
            fn provider(&self) -> MatchProvider {
                MatchProvider::Pexels
            }

            async fn find_candidate(&self, _text: &str, _topic: Option<&str>) -> MatchResult<MediaSourceCandidate> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.candidate
                    .clone()
                    .ok_or_else(|| MatchError::not_found("no footage"))
            }
        }
    }

    fn service(matcher: Arc<StaticMatcher>, work: &TempDir, out: &TempDir) -> QuoteReelService {
        let config = RenderConfig::default()
            .with_work_dir(work.path())
            .with_output_dir(out.path());
        let pipeline = RenderPipeline::new(config, reqwest::Client::new(), None);
        QuoteReelService::new(matcher, pipeline)
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(true)
    }

    #[tokio::test]
    async fn test_no_match_renders_nothing() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let matcher = Arc::new(StaticMatcher {
            candidate: None,
            calls: Default::default(),
        });
        let service = service(matcher.clone(), &work, &out);

        let err = service
            .render(Quote::new("Stay strong.", "Anonymous"), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkerError::NoMatch(_)));
        assert_eq!(matcher.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(dir_is_empty(work.path()));
        assert!(dir_is_empty(out.path()));
    }

    #[tokio::test]
    async fn test_unreachable_footage_surfaces_media_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let candidate =
            MediaSourceCandidate::from_tiers(None, Some(format!("{}/clip.mp4", server.uri())), None);
        let matcher = Arc::new(StaticMatcher {
            candidate,
            calls: Default::default(),
        });
        let service = service(matcher, &work, &out);

        let err = service
            .render(Quote::new("Stay strong.", "Anonymous"), None, Some(6.0))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkerError::Media(MediaError::AcquisitionFailed { .. })));
        assert!(dir_is_empty(out.path()));
    }

    #[tokio::test]
    async fn test_list_videos_only_mp4() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("quote_video_a.mp4"), b"abc").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.mp4")).unwrap();

        let videos = list_videos(dir.path()).await.unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].file_name, "quote_video_a.mp4");
        assert_eq!(videos[0].size_bytes, 3);
    }

    #[tokio::test]
    async fn test_list_videos_missing_dir() {
        let dir = TempDir::new().unwrap();
        let videos = list_videos(&dir.path().join("missing")).await.unwrap();
        assert!(videos.is_empty());
    }
}
