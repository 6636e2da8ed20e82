//! Quote generation.

use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::info;

use qreel_models::{Quote, QUOTE_TOPICS};

use crate::error::{MatchError, MatchResult};
use crate::generation::TextGenerator;

/// Author used when the reply names none.
pub const ANONYMOUS: &str = "Anonymous";

/// Asks the text generator for short original quotes.
pub struct QuoteGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl QuoteGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a quote on `topic`, or on a random known topic.
    pub async fn generate(&self, topic: Option<&str>) -> MatchResult<Quote> {
        let topic = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) => topic.to_string(),
            None => random_topic(),
        };

        let reply = self.generator.generate(&build_quote_prompt(&topic)).await?;
        let quote = parse_quote_reply(&reply)?.with_topic(topic);

        info!(topic = ?quote.topic, author = %quote.author, "Generated quote");
        Ok(quote)
    }
}

fn random_topic() -> String {
    let mut rng = rand::rng();
    QUOTE_TOPICS
        .choose(&mut rng)
        .copied()
        .unwrap_or("inspirational")
        .to_string()
}

fn build_quote_prompt(topic: &str) -> String {
    format!(
        "Generate a short, impactful quote about '{topic}'.\n\
         The quote should be original and insightful.\n\
         Also, provide the author of the quote. If the author is unknown, or if you are generating it, use \"Anonymous\".\n\
         Format your response strictly as:\n\
         Quote: [The quote text]\n\
         Author: [The author's name]"
    )
}

/// Parse `Quote:` and `Author:` lines (case-insensitive).
pub fn parse_quote_reply(reply: &str) -> MatchResult<Quote> {
    let mut text = None;
    let mut author = None;

    for line in reply.lines().map(str::trim) {
        if let Some(value) = strip_label(line, "quote:") {
            text = Some(unquote(value));
        } else if let Some(value) = strip_label(line, "author:") {
            author = Some(unquote(value));
        }
    }

    let text = text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| MatchError::generation("reply has no 'Quote:' line"))?;
    let author = author
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| ANONYMOUS.to_string());

    Ok(Quote::new(text, author))
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label).then(|| &line[label.len()..])
}

fn unquote(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\u{201c}' | '\u{201d}' | '*'))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockTextGenerator;

    #[test]
    fn test_parse_reply() {
        let quote = parse_quote_reply("Quote: \"Courage grows in small steps.\"\nAuthor: Anonymous\n").unwrap();
        assert_eq!(quote.text, "Courage grows in small steps.");
        assert_eq!(quote.author, "Anonymous");
    }

    #[test]
    fn test_parse_is_case_insensitive_and_tolerates_noise() {
        let reply = "Here you go!\n\nQUOTE: Stay strong.\nauthor:   Maya  \n";
        let quote = parse_quote_reply(reply).unwrap();
        assert_eq!(quote.text, "Stay strong.");
        assert_eq!(quote.author, "Maya");
    }

    #[test]
    fn test_missing_author_defaults_to_anonymous() {
        let quote = parse_quote_reply("Quote: Keep going.").unwrap();
        assert_eq!(quote.author, ANONYMOUS);
    }

    #[test]
    fn test_missing_quote_is_generation_error() {
        assert!(matches!(
            parse_quote_reply("Author: Someone"),
            Err(MatchError::Generation(_))
        ));
        assert!(matches!(parse_quote_reply("Quote:   "), Err(MatchError::Generation(_))));
    }

    #[tokio::test]
    async fn test_generate_uses_requested_topic() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt| prompt.contains("'courage'"))
            .times(1)
            .returning(|_| Ok("Quote: Stay strong.\nAuthor: Anonymous".to_string()));

        let quote = QuoteGenerator::new(Arc::new(generator))
            .generate(Some("courage"))
            .await
            .unwrap();

        assert_eq!(quote.text, "Stay strong.");
        assert_eq!(quote.topic.as_deref(), Some("courage"));
    }

    #[tokio::test]
    async fn test_random_topic_comes_from_known_list() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("Quote: Stay strong.".to_string()));

        let quote = QuoteGenerator::new(Arc::new(generator)).generate(None).await.unwrap();
        let topic = quote.topic.unwrap();
        assert!(QUOTE_TOPICS.contains(&topic.as_str()));
    }
}
