//! NewsAPI "top headlines" loader.
//!
//! Fetches `GET {base}/v2/top-headlines?country=..` and maps each JSON
//! article onto [`Article`].  Articles without a usable `urlToImage` are
//! dropped, as with RSS items without an image.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::http::HttpClient;
use super::{Article, NewsLoader, NewsLoaderCompletion};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Error payload returned by NewsAPI when `status` is not `"ok"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("NewsAPI error {code}: {message}")]
pub struct NewsApiError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    status: String,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RemoteArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

impl RemoteArticle {
    fn into_article(self) -> Option<Article> {
        let image_url = self.url_to_image.as_deref().and_then(|u| Url::parse(u).ok());
        let Some(image_url) = image_url else {
            debug!(title = self.title.as_deref().unwrap_or_default(), "skipping article without image");
            return None;
        };

        Some(Article {
            title: self.title.unwrap_or_else(|| "(untitled)".into()),
            description: self.description.unwrap_or_default(),
            url: self.url.as_deref().and_then(|u| Url::parse(u).ok()),
            image_url,
            // Parsed per article so one bad date cannot fail the response.
            published_at: self
                .published_at
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.with_timezone(&Utc)),
            content: self.content,
        })
    }
}

/// Top headlines for one country.
#[derive(Clone, Debug)]
pub struct NewsApiLoader {
    http: HttpClient,
    endpoint: Url,
    api_key: String,
}

impl NewsApiLoader {
    pub fn new(http: HttpClient, api_key: impl Into<String>, country: &str) -> Result<Self> {
        Self::with_base_url(http, DEFAULT_BASE_URL, api_key, country)
    }

    pub fn with_base_url(
        http: HttpClient,
        base_url: &str,
        api_key: impl Into<String>,
        country: &str,
    ) -> Result<Self> {
        let mut endpoint = Url::parse(base_url)
            .and_then(|base| base.join("/v2/top-headlines"))
            .with_context(|| format!("invalid NewsAPI base URL {base_url}"))?;
        endpoint.query_pairs_mut().append_pair("country", country);

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Decode a response body.  Pure, for tests.
    pub fn parse_response(body: &[u8]) -> Result<Vec<Article>> {
        let response: Response = serde_json::from_slice(body).context("decoding NewsAPI response")?;
        if response.status != "ok" {
            return Err(NewsApiError {
                code: response.code.unwrap_or_else(|| response.status.clone()),
                message: response.message.unwrap_or_default(),
            }
            .into());
        }
        Ok(response
            .articles
            .into_iter()
            .filter_map(RemoteArticle::into_article)
            .collect())
    }
}

async fn fetch_headlines(client: Client, endpoint: Url, api_key: String) -> Result<Vec<Article>> {
    // NewsAPI reports errors as JSON with a non-2xx status, so the body is
    // decoded before the status is considered.
    let body = client
        .get(endpoint.clone())
        .header("X-Api-Key", api_key)
        .send()
        .await
        .with_context(|| format!("requesting {endpoint}"))?
        .bytes()
        .await?;
    NewsApiLoader::parse_response(&body)
}

impl NewsLoader for NewsApiLoader {
    fn load(&self, completion: NewsLoaderCompletion) {
        let client = self.http.client().clone();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        debug!(%endpoint, "loading top headlines");

        self.http.spawn(fetch_headlines(client, endpoint, api_key), completion);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
