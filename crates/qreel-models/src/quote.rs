//! Quote model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Topics used when a quote is generated without an explicit topic.
pub const QUOTE_TOPICS: &[&str] = &[
    "happiness",
    "love",
    "selfconfidence",
    "success",
    "inspirational",
    "wisdom",
    "courage",
    "life",
    "knowledge",
    "motivation",
];

/// Text to render, attributed to an author.
///
/// Quotes are immutable inputs; two quotes with the same content are the same quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    /// Quote body
    pub text: String,
    /// Attributed author
    pub author: String,
    /// Optional theme (e.g. "courage"), used as extra context when matching footage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Quote {
    /// Create a quote, trimming surrounding whitespace.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            author: author.into().trim().to_string(),
            topic: None,
        }
    }

    /// Attach a topic. Blank topics are ignored.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        let topic = topic.trim();
        self.topic = (!topic.is_empty()).then(|| topic.to_string());
        self
    }

    /// Text handed to the text generator when building a footage search query.
    pub fn search_context(&self) -> String {
        match &self.topic {
            Some(topic) => format!("{} quote: {}", topic, self.text),
            None => self.text.clone(),
        }
    }

    /// Whether the quote has any text to render.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}
