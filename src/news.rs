//! News fetch client for the NewsAPI `everything` endpoint.
//!
//! One request per topic: the topic string is the full-text query, results
//! come back newest first, capped at the configured page size. Responses are
//! normalized into [`Article`] values at this boundary so the rest of the
//! pipeline never sees the wire format.
//!
//! Failures map onto the error taxonomy by HTTP status and the `code` field
//! NewsAPI puts in its JSON error body:
//! - `apiKeyInvalid` / `apiKeyMissing` / `apiKeyDisabled` (or plain 401) -> [`BriefingError::Auth`]
//! - `rateLimited` (or plain 429) -> [`BriefingError::RateLimited`]
//! - anything else -> [`BriefingError::Network`]

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::{BriefingError, Result};
use crate::models::Article;
use crate::utils::truncate_for_log;

/// Production NewsAPI endpoint.
const NEWSAPI_BASE_URL: &str = "https://newsapi.org";

/// Service tag carried in error variants and logs.
const SERVICE: &str = "newsapi";

/// Capability to fetch recent articles for a single topic.
///
/// The orchestrator is generic over this, so tests can drive it with a
/// scripted source instead of a live endpoint.
pub trait FetchArticles {
    /// Fetch the most recent articles matching `topic`, newest first.
    ///
    /// # Returns
    ///
    /// The normalized articles; an empty vector when the source has nothing
    /// for this topic. Errors describe a single failed attempt, there are
    /// no retries.
    async fn fetch_articles(&self, topic: &str) -> Result<Vec<Article>>;
}

/// One article as NewsAPI serializes it. Every field can be `null`.
#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

impl RawArticle {
    /// Normalize into the domain type, substituting renderable placeholders
    /// for a missing title or link.
    fn into_article(self) -> Article {
        Article {
            title: self.title.unwrap_or_else(|| "No Title".to_string()),
            description: self.description,
            url: self.url.unwrap_or_else(|| "#".to_string()),
            content: self.content,
        }
    }
}

/// Success envelope of the `everything` endpoint.
#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// Error body NewsAPI returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct NewsApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// HTTP client for the news source.
pub struct NewsApiClient {
    http: Client,
    api_key: String,
    base_url: String,
    page_size: usize,
}

impl NewsApiClient {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// # Arguments
    ///
    /// * `api_key` - NewsAPI key, sent as a query parameter
    /// * `page_size` - How many articles to request per topic
    /// * `timeout` - Overall per-request timeout
    pub fn new(api_key: impl Into<String>, page_size: usize, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BriefingError::network(SERVICE, e))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: NEWSAPI_BASE_URL.to_string(),
            page_size,
        })
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn everything_url(&self, topic: &str) -> String {
        format!(
            "{}/v2/everything?q={}&sortBy=publishedAt&pageSize={}&apiKey={}",
            self.base_url,
            urlencoding::encode(topic),
            self.page_size,
            self.api_key
        )
    }
}

impl FetchArticles for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(%topic))]
    async fn fetch_articles(&self, topic: &str) -> Result<Vec<Article>> {
        // The URL carries the API key; keep it out of logs.
        let response = self
            .http
            .get(self.everything_url(topic))
            .send()
            .await
            .map_err(|e| BriefingError::network(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        let parsed: EverythingResponse = response
            .json()
            .await
            .map_err(|e| BriefingError::network(SERVICE, e))?;

        let articles: Vec<Article> = parsed
            .articles
            .into_iter()
            .map(RawArticle::into_article)
            .collect();

        info!(count = articles.len(), "Fetched articles");
        Ok(articles)
    }
}

/// Map a non-2xx response onto the error taxonomy.
fn classify_error(status: StatusCode, body: &str) -> BriefingError {
    let parsed = serde_json::from_str::<NewsApiErrorBody>(body).ok();
    let code = parsed.as_ref().map(|b| b.code.as_str()).unwrap_or_default();

    if status == StatusCode::UNAUTHORIZED
        || matches!(code, "apiKeyInvalid" | "apiKeyMissing" | "apiKeyDisabled")
    {
        return BriefingError::Auth { service: SERVICE };
    }
    if status == StatusCode::TOO_MANY_REQUESTS || code == "rateLimited" {
        return BriefingError::RateLimited { service: SERVICE };
    }

    let detail = parsed
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| truncate_for_log(body, 300));
    BriefingError::network(SERVICE, format!("unexpected status {status}: {detail}"))
}
