//! Environment-backed configuration for API credentials and mail settings.
//!
//! All secrets come from the process environment (a `.env` file is loaded
//! first if present, for local runs). Loading is strict: every credential
//! the run needs must be present and non-blank up front, so a misconfigured
//! deployment fails before any network call is made.
//!
//! # Required variables
//!
//! - `NEWS_API_KEY` - news source API key
//! - `OPENAI_API_KEY` - summarization API key
//! - `SENDER_EMAIL` - From address and SMTP username
//! - `SENDER_PASSWORD` - SMTP password (for Gmail, an app password)
//! - `RECEIVER_EMAIL` - To address
//!
//! # Optional variables
//!
//! - `SMTP_HOST` (default `smtp.gmail.com`)
//! - `SMTP_PORT` (default `587`, the STARTTLS submission port)

use std::env;

use crate::error::{BriefingError, Result};

/// Default SMTP relay host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP port (587 for STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Everything the run reads from the environment, resolved once at startup
/// and passed down explicitly. No module reads the environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the news source.
    pub news_api_key: String,
    /// API key for the summarization endpoint.
    pub openai_api_key: String,
    /// From address; also the SMTP username.
    pub sender_email: String,
    /// SMTP password for the sender account.
    pub sender_password: String,
    /// To address for the briefing.
    pub receiver_email: String,
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`BriefingError::Config`] naming the first missing required
    /// variable, or describing an unparsable `SMTP_PORT`.
    pub fn from_env() -> Result<Self> {
        // Best effort; absence of a .env file is the normal deployed case.
        dotenvy::dotenv().ok();

        Ok(Self {
            news_api_key: require_env("NEWS_API_KEY")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            sender_email: require_env("SENDER_EMAIL")?,
            sender_password: require_env("SENDER_PASSWORD")?,
            receiver_email: require_env("RECEIVER_EMAIL")?,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: smtp_port_from_env()?,
        })
    }
}

/// Read a required variable, treating blank values as missing.
fn require_env(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(BriefingError::Config(format!(
            "required environment variable {name} is not set"
        ))),
    }
}

fn smtp_port_from_env() -> Result<u16> {
    match env::var("SMTP_PORT") {
        Ok(raw) => parse_smtp_port(&raw),
        Err(_) => Ok(DEFAULT_SMTP_PORT),
    }
}

fn parse_smtp_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|_| BriefingError::Config(format!("SMTP_PORT is not a valid port number: {raw}")))
}
