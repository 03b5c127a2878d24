//! # News Briefing
//!
//! A news briefing pipeline that fetches recent articles for a set of
//! topics, summarizes each one through an OpenAI-compatible chat model,
//! and emails the collected summaries as a single HTML digest.
//!
//! ## Features
//!
//! - Fetches articles per topic from NewsAPI, newest first
//! - Summarizes each article into one paragraph via the chat completions API
//! - Renders one HTML briefing (with a plain-text alternative part)
//! - Delivers the briefing over SMTP with STARTTLS
//! - Skips failed topics and articles instead of aborting the run
//!
//! ## Usage
//!
//! ```sh
//! news_briefing
//! news_briefing -t "rust language" --articles-per-topic 5
//! ```
//!
//! Credentials come from the environment (or a local `.env` file); see
//! [`config`] for the variable list.
//!
//! ## Architecture
//!
//! The application follows a strictly sequential pipeline:
//! 1. **Fetch**: query the news API once per configured topic
//! 2. **Summarize**: send each article's text to the model, one at a time
//! 3. **Render**: assemble one HTML document from every summary produced
//! 4. **Deliver**: submit the email; only then does the run count as done
//!
//! The process exits 0 only when the briefing was accepted by the SMTP
//! relay. Any fatal error prints to stderr and exits 1.

use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod digest;
mod error;
mod mailer;
mod models;
mod news;
mod pipeline;
mod summarizer;
mod utils;

use cli::Cli;
use config::Config;
use error::Result;
use mailer::SmtpMailer;
use news::NewsApiClient;
use pipeline::{Pipeline, RunReport};
use summarizer::OpenAiSummarizer;

#[tokio::main]
#[instrument]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_briefing starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match run(args).await {
        Ok(report) => {
            let elapsed = start_time.elapsed();
            info!(
                topics = report.topics_queried,
                topics_failed = report.topics_failed,
                fetched = report.articles_fetched,
                summarized = report.articles_summarized,
                skipped = report.articles_skipped,
                secs = elapsed.as_secs(),
                millis = elapsed.subsec_millis(),
                "Execution complete"
            );
        }
        Err(e) => {
            error!(error = %e, "Briefing run failed");
            eprintln!("news_briefing: {e}");
            std::process::exit(1);
        }
    }
}

/// Load configuration, wire the clients together, and run one briefing.
///
/// This is the only place that reads the environment or constructs the
/// HTTP/SMTP clients; everything below receives its dependencies
/// explicitly.
async fn run(args: Cli) -> Result<RunReport> {
    let config = Config::from_env()?;
    let timeout = Duration::from_secs(args.timeout_secs);
    let topics = args.topics();
    info!(
        ?topics,
        articles_per_topic = args.articles_per_topic,
        model = %args.model,
        smtp_host = %config.smtp_host,
        "Configuration loaded"
    );

    let news = NewsApiClient::new(config.news_api_key.clone(), args.articles_per_topic, timeout)?;
    let summarizer = OpenAiSummarizer::new(config.openai_api_key.clone(), args.model, timeout)?;
    let mailer = SmtpMailer::new(&config, timeout);

    Pipeline::new(topics, news, summarizer, mailer).run().await
}
