//! Data models for news articles and their summarized representations.
//!
//! This module defines the core data structures passed between pipeline
//! stages:
//! - [`Article`]: one news item as fetched from the news source
//! - [`Summary`]: one article after summarization, ready for rendering
//! - [`TopicSection`]: all summaries collected for a single topic
//!
//! The structures are plain owned data; the HTTP wire formats live next to
//! the clients that speak them.

/// A news article as fetched from the news source, reduced to the fields
/// the briefing uses.
///
/// Missing titles and links are normalized at the fetch boundary, so `title`
/// and `url` always hold something renderable. `description` and `content`
/// stay optional: the source regularly omits either, and an article with
/// neither is skipped rather than summarized.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// The headline, or `"No Title"` when the source sent none.
    pub title: String,
    /// Short teaser text, when the source provides one.
    pub description: Option<String>,
    /// Link to the full story, or `"#"` when the source sent none.
    pub url: String,
    /// Leading body text, when the source provides it. Usually truncated
    /// by the source itself.
    pub content: Option<String>,
}

impl Article {
    /// The text handed to the summarizer: title, description, and content
    /// joined by blank lines, in that order, skipping absent parts.
    ///
    /// # Returns
    ///
    /// `None` when both description and content are missing or blank. A bare
    /// headline is not worth a model call, so such articles are skipped.
    pub fn summarizable_text(&self) -> Option<String> {
        let description = self.description.as_deref().unwrap_or("").trim();
        let content = self.content.as_deref().unwrap_or("").trim();
        if description.is_empty() && content.is_empty() {
            return None;
        }
        let parts: Vec<&str> = [self.title.trim(), description, content]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        Some(parts.join("\n\n"))
    }
}

/// A summarized article, ready for the digest renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Headline shown as the link text.
    pub title: String,
    /// Link target for the headline.
    pub url: String,
    /// The model-produced summary paragraph.
    pub text: String,
}

/// All summaries collected for one topic, in the order the source
/// returned the underlying articles.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSection {
    /// The topic as configured for the run.
    pub topic: String,
    /// Summaries for this topic; may be empty when every article failed
    /// or was skipped.
    pub summaries: Vec<Summary>,
}
