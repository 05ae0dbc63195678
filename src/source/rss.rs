//! RSS feed loader.
//!
//! This module shows how to implement [`NewsLoader`] for a concrete feed
//! format.  Use it as a template when adding support for Atom, JSON Feed, or
//! any other format.
//!
//! ## For contributors — adding a new feed type
//!
//! 1. Create a new file under `src/source/` (e.g. `atom.rs`).
//! 2. Define a struct holding an [`HttpClient`] and whatever configuration
//!    your feed needs (URL, API key, etc.).
//! 3. Implement [`NewsLoader`] for your struct — spawn the request with
//!    [`HttpClient::spawn`] and return parsed `Vec<Article>` through it.
//! 4. Re-export your struct from `src/source/mod.rs`.
//!
//! The RSS implementation below is a complete worked example.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use tracing::debug;

use super::http::{get, HttpClient};
use super::{newest_first, Article, NewsLoader, NewsLoaderCompletion};

/// An RSS 2.0 feed.
///
/// Only items that carry an image (an `image/*` enclosure, `media:content` or
/// `media:thumbnail`) become articles, since every row shows one.
#[derive(Clone, Debug)]
pub struct RssNewsLoader {
    http: HttpClient,
    url: Url,
}

impl RssNewsLoader {
    /// Create a loader for the feed at `url` (e.g.
    /// `https://feeds.bbci.co.uk/news/rss.xml`).
    pub fn new(http: HttpClient, url: Url) -> Self {
        Self { http, url }
    }

    /// Parse an already-fetched [`rss::Channel`] into newest-first
    /// [`Article`]s.
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// parsing logic without hitting the network.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<Article> {
        let mut articles: Vec<Article> = channel
            .items()
            .iter()
            .filter_map(|item| {
                let Some(image_url) = image_url(item) else {
                    debug!(title = item.title().unwrap_or_default(), "skipping RSS item without image");
                    return None;
                };

                // Parse RFC-2822 date; gracefully degrade to None on failure.
                let published_at = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                Some(Article {
                    title: item.title().unwrap_or("(untitled)").to_string(),
                    description: item.description().unwrap_or_default().to_string(),
                    url: item.link().and_then(|link| Url::parse(link).ok()),
                    image_url,
                    published_at,
                    content: item.content().map(String::from),
                })
            })
            .collect();

        newest_first(&mut articles);
        articles
    }
}

/// Prefer an `image/*` enclosure, then `media:content`, then `media:thumbnail`.
fn image_url(item: &rss::Item) -> Option<Url> {
    let enclosure = item
        .enclosure()
        .filter(|e| e.mime_type().starts_with("image/"))
        .map(|e| e.url());

    let media = item.extensions().get("media");
    let media_url = |name: &str| {
        media
            .and_then(|m| m.get(name))
            .and_then(|exts| exts.iter().find_map(|ext| ext.attrs().get("url")))
            .map(String::as_str)
    };

    [enclosure, media_url("content"), media_url("thumbnail")]
        .into_iter()
        .flatten()
        .find_map(|candidate| Url::parse(candidate).ok())
}

async fn fetch_channel(client: &Client, url: Url) -> Result<rss::Channel> {
    let body = get(client, url.clone()).await?.bytes().await?;
    rss::Channel::read_from(body.as_ref()).with_context(|| format!("parsing RSS from {url}"))
}

impl NewsLoader for RssNewsLoader {
    fn load(&self, completion: NewsLoaderCompletion) {
        let client = self.http.client().clone();
        let url = self.url.clone();
        debug!(%url, "loading RSS feed");

        self.http.spawn(
            async move {
                let channel = fetch_channel(&client, url).await?;
                Ok(Self::parse_channel(&channel))
            },
            completion,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
