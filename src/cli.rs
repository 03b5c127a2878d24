//! Command-line interface definitions for the news briefing.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option has a sensible default, so the binary runs unattended with
//! no arguments; flags and environment variables override per run.
//!
//! Credentials are deliberately not CLI arguments. They are read from the
//! environment by [`crate::config`] so they never show up in shell history
//! or process listings.

use clap::Parser;

/// Topics queried when no `--topic` flag is given.
pub const DEFAULT_TOPICS: [&str; 3] = [
    "AI in medicine",
    "US economic outlook",
    "NASA Artemis program",
];

/// How many articles to request per topic unless overridden.
pub const DEFAULT_ARTICLES_PER_TOPIC: usize = 3;

/// Per-request timeout unless overridden.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments for the news briefing run.
///
/// # Examples
///
/// ```sh
/// # Stock briefing: built-in topics, default model
/// news_briefing
///
/// # Replace the topic list for one run
/// news_briefing -t "rust language" -t "open source funding"
///
/// # Ask for more articles per topic and a different model
/// news_briefing --articles-per-topic 5 --model gpt-4o-mini
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to fetch news for; repeat to replace the entire built-in list
    #[arg(short = 't', long = "topic", value_name = "TOPIC")]
    pub topic: Vec<String>,

    /// Number of articles to request per topic
    #[arg(long, env = "ARTICLES_PER_TOPIC", default_value_t = DEFAULT_ARTICLES_PER_TOPIC)]
    pub articles_per_topic: usize,

    /// Chat model used for summarization
    #[arg(long, env = "OPENAI_MODEL", default_value = crate::summarizer::DEFAULT_MODEL)]
    pub model: String,

    /// Timeout for each outbound network call, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Cli {
    /// The topic list for this run: the `--topic` flags verbatim, or the
    /// built-in defaults when none were given.
    pub fn topics(&self) -> Vec<String> {
        if self.topic.is_empty() {
            DEFAULT_TOPICS.iter().map(|topic| topic.to_string()).collect()
        } else {
            self.topic.clone()
        }
    }
}
