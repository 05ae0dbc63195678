//! The article value shared by every feed loader.
//!
//! `Article` is what a [`NewsLoader`](super::NewsLoader) yields and what the
//! headlines controller renders.  Every loader converts its native format
//! (RSS items, NewsAPI JSON, ...) into `Article`s so the rest of the crate
//! stays source-agnostic.

use chrono::{DateTime, Utc};
use reqwest::Url;

/// A single headline, normalised from any feed loader.
///
/// Equality is by value.  A snapshot of articles is owned by the controller
/// and replaced wholesale on each successful load.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Article {
    /// Human-readable headline.
    pub title: String,

    /// Short summary shown below the headline.  Empty when the feed has none.
    pub description: String,

    /// Link to the full story.
    pub url: Option<Url>,

    /// Image fetched for the row once it becomes visible.
    pub image_url: Url,

    /// Publication timestamp.
    pub published_at: Option<DateTime<Utc>>,

    /// Body excerpt.  `None` hides the content area of the row.
    pub content: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, description: impl Into<String>, image_url: Url) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: None,
            image_url,
            published_at: None,
            content: None,
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Ordering — reverse chronological (newest first)
// ---------------------------------------------------------------------------

/// Stable sort, newest first.
///
/// `None` is less than `Some(_)`, so comparing `b` against `a` sinks undated
/// articles to the bottom while keeping their feed order.
pub fn newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
