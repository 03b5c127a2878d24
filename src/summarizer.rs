//! Summarization client for an OpenAI-compatible chat completions API.
//!
//! Each article becomes one chat request: a fixed system prompt plus the
//! article text as the user message. The reply's first choice is the
//! summary. Requests are independent; a failure affects only the article
//! that triggered it.
//!
//! Status mapping:
//! - 401 / 403 -> [`BriefingError::Auth`]
//! - 429 with an `insufficient_quota` code -> [`BriefingError::Quota`]
//! - any other 429 -> [`BriefingError::RateLimited`]
//! - everything else unusable -> [`BriefingError::Model`]

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{BriefingError, Result};
use crate::utils::truncate_for_log;

/// Production OpenAI endpoint.
const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Chat model used unless overridden by `--model` / `OPENAI_MODEL`.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Instruction the model receives ahead of every article.
const SYSTEM_PROMPT: &str = "You are a newsletter assistant. Summarize the following news article content into one concise paragraph (3-4 sentences).";

/// Upper bound in bytes on the article text sent per request. News sources
/// already truncate `content`, so this only trims pathological inputs.
const MAX_INPUT_LEN: usize = 10_000;

/// Service tag carried in error variants and logs.
const SERVICE: &str = "openai";

/// Capability to produce a short summary for one piece of article text.
pub trait Summarize {
    /// Summarize `text` into one short paragraph.
    ///
    /// # Errors
    ///
    /// A single attempt; any failure is returned to the caller, which
    /// decides whether to skip the article.
    async fn summarize(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Error envelope the API returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// HTTP client for the summarization endpoint.
pub struct OpenAiSummarizer {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key, sent as a bearer token
    /// * `model` - Chat model name, e.g. [`DEFAULT_MODEL`]
    /// * `timeout` - Overall per-request timeout
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BriefingError::network(SERVICE, e))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: clip_input(text),
                },
            ],
        }
    }
}

impl Summarize for OpenAiSummarizer {
    #[instrument(level = "info", skip_all, fields(input_len = text.len()))]
    async fn summarize(&self, text: &str) -> Result<String> {
        let request = self.build_request(text);
        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BriefingError::network(SERVICE, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BriefingError::network(SERVICE, e))?;
        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| BriefingError::Model(format!("undecodable response: {e}")))?;

        let summary = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|summary| !summary.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| BriefingError::Model("response contained no summary text".to_string()))?;

        debug!(chars = summary.len(), "Received summary");
        Ok(summary)
    }
}

/// Cap the article text, backing up to the nearest char boundary.
fn clip_input(text: &str) -> String {
    if text.len() <= MAX_INPUT_LEN {
        return text.to_string();
    }
    let mut end = MAX_INPUT_LEN;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// Map a non-2xx response onto the error taxonomy.
fn classify_error(status: StatusCode, body: &str) -> BriefingError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return BriefingError::Auth { service: SERVICE };
    }

    let detail = serde_json::from_str::<ApiErrorBody>(body).ok().map(|b| b.error);
    if status == StatusCode::TOO_MANY_REQUESTS {
        let out_of_quota = detail
            .as_ref()
            .map(|d| {
                d.code.as_deref() == Some("insufficient_quota")
                    || d.kind.as_deref() == Some("insufficient_quota")
            })
            .unwrap_or(false);
        return if out_of_quota {
            BriefingError::Quota { service: SERVICE }
        } else {
            BriefingError::RateLimited { service: SERVICE }
        };
    }

    let message = detail
        .map(|d| d.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| truncate_for_log(body, 300));
    BriefingError::Model(format!("unexpected status {status}: {message}"))
}
