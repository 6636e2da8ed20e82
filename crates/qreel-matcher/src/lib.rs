//! Matching quotes to stock footage.
//!
//! Three strategies sit behind the [`ContentMatcher`] trait:
//! - [`CategoricalMatcher`]: the generator picks a provider category (Coverr)
//! - [`SemanticMatcher`]: the generator writes a search query (Pexels, Pixabay)
//!
//! plus [`QuoteGenerator`] for producing quotes in the first place.

pub mod categorical;
pub mod error;
pub mod generation;
pub mod matcher;
pub mod metrics;
pub mod providers;
pub mod quotes;
pub mod semantic;
pub mod tiers;

pub use categorical::CategoricalMatcher;
pub use error::{MatchError, MatchResult};
pub use generation::{GeminiClient, GeminiConfig, TextGenerator};
pub use matcher::{ContentMatcher, MatchProvider};
pub use providers::{
    CategoryProvider, CoverrClient, CoverrConfig, PexelsClient, PexelsConfig, PixabayClient,
    PixabayConfig, SearchHit, SearchQuery, VideoAsset, VideoSearchProvider,
};
pub use quotes::QuoteGenerator;
pub use semantic::SemanticMatcher;
pub use tiers::{extract_tiers, TierPolicy};
