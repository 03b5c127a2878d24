//! Sequential orchestration of one briefing run.
//!
//! The pipeline walks the configured topics in order: fetch articles,
//! summarize each one, collect the survivors into topic sections, render
//! once, send once. Everything is strictly sequential; there is exactly one
//! in-flight request at any moment.
//!
//! Failure policy: a failed topic fetch or article summarization is logged
//! and skipped, shrinking the briefing instead of killing the run. Only
//! three things are fatal: bad configuration (caught before the pipeline
//! exists), a briefing with zero summaries, and a failed delivery.

use chrono::Local;
use tracing::{info, warn};

use crate::digest;
use crate::error::{BriefingError, Result};
use crate::mailer::SendMail;
use crate::models::{Summary, TopicSection};
use crate::news::FetchArticles;
use crate::summarizer::Summarize;

/// Counters describing what one run actually did. Logged at the end and
/// returned to `main`.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Topics the run attempted.
    pub topics_queried: usize,
    /// Topics whose fetch failed outright.
    pub topics_failed: usize,
    /// Articles fetched across all topics.
    pub articles_fetched: usize,
    /// Articles that made it into the briefing.
    pub articles_summarized: usize,
    /// Articles dropped: no usable text, or summarization failed.
    pub articles_skipped: usize,
}

/// One-shot orchestrator wiring a news source, a summarizer, and a mailer.
///
/// Generic over the three capability traits so tests can substitute
/// scripted implementations for the HTTP clients.
pub struct Pipeline<N, S, M> {
    topics: Vec<String>,
    news: N,
    summarizer: S,
    mailer: M,
}

impl<N, S, M> Pipeline<N, S, M>
where
    N: FetchArticles,
    S: Summarize,
    M: SendMail,
{
    /// Assemble a pipeline for the given topic list.
    pub fn new(topics: Vec<String>, news: N, summarizer: S, mailer: M) -> Self {
        Self {
            topics,
            news,
            summarizer,
            mailer,
        }
    }

    /// Run the whole briefing once: fetch, summarize, render, send.
    ///
    /// # Errors
    ///
    /// [`BriefingError::EmptyDigest`] when not a single article produced a
    /// summary, and whatever the mailer reports when delivery fails. Topic
    /// and article level failures are logged and absorbed.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();
        let mut sections: Vec<TopicSection> = Vec::new();

        for topic in &self.topics {
            report.topics_queried += 1;
            info!(%topic, "Processing topic");

            let articles = match self.news.fetch_articles(topic).await {
                Ok(articles) => articles,
                Err(e) => {
                    warn!(%topic, error = %e, "Fetching articles failed; skipping topic");
                    report.topics_failed += 1;
                    continue;
                }
            };
            if articles.is_empty() {
                info!(%topic, "No articles found");
                continue;
            }
            report.articles_fetched += articles.len();

            let mut summaries = Vec::new();
            for article in articles {
                let Some(text) = article.summarizable_text() else {
                    warn!(%topic, title = %article.title, "Article has no text to summarize; skipping");
                    report.articles_skipped += 1;
                    continue;
                };
                match self.summarizer.summarize(&text).await {
                    Ok(summary) => summaries.push(Summary {
                        title: article.title,
                        url: article.url,
                        text: summary,
                    }),
                    Err(e) => {
                        warn!(%topic, title = %article.title, error = %e, "Summarization failed; skipping article");
                        report.articles_skipped += 1;
                    }
                }
            }

            report.articles_summarized += summaries.len();
            sections.push(TopicSection {
                topic: topic.clone(),
                summaries,
            });
        }

        if report.articles_summarized == 0 {
            return Err(BriefingError::EmptyDigest);
        }

        let html = digest::render_html(&sections);
        let text = digest::render_text(&sections);
        let subject = digest::subject(Local::now().date_naive());

        self.mailer.send(&subject, &html, &text).await?;

        info!(
            topics = report.topics_queried,
            topics_failed = report.topics_failed,
            summarized = report.articles_summarized,
            skipped = report.articles_skipped,
            "Briefing sent"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Serves scripted article lists per topic; listed topics fail outright.
    #[derive(Default)]
    struct StubNews {
        articles: HashMap<String, Vec<Article>>,
        fail_topics: Vec<String>,
    }

    impl FetchArticles for StubNews {
        async fn fetch_articles(&self, topic: &str) -> Result<Vec<Article>> {
            if self.fail_topics.iter().any(|t| t == topic) {
                return Err(BriefingError::network("newsapi", "scripted outage"));
            }
            Ok(self.articles.get(topic).cloned().unwrap_or_default())
        }
    }

    /// Records every input; fails when the text contains "FAIL".
    #[derive(Clone, Default)]
    struct StubSummarizer {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Summarize for StubSummarizer {
        async fn summarize(&self, text: &str) -> Result<String> {
            self.calls.lock().unwrap().push(text.to_string());
            if text.contains("FAIL") {
                return Err(BriefingError::Model("scripted failure".to_string()));
            }
            Ok(format!("summary: {}", text.lines().next().unwrap_or_default()))
        }
    }

    /// Always answers with the same canned summary.
    struct ScriptedSummarizer(&'static str);

    impl Summarize for ScriptedSummarizer {
        async fn summarize(&self, _text: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Records every send; optionally refuses delivery.
    #[derive(Clone, Default)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<(String, String, String)>>>,
        fail: bool,
    }

    impl SendMail for RecordingMailer {
        async fn send(&self, subject: &str, html_body: &str, text_body: &str) -> Result<()> {
            if self.fail {
                return Err(BriefingError::Delivery("scripted refusal".to_string()));
            }
            self.sent.lock().unwrap().push((
                subject.to_string(),
                html_body.to_string(),
                text_body.to_string(),
            ));
            Ok(())
        }
    }

    fn article(title: &str, content: Option<&str>) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url: format!("https://example.com/{}", title.to_lowercase()),
            content: content.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_no_articles_anywhere_fails_without_sending() {
        let mailer = RecordingMailer::default();
        let pipeline = Pipeline::new(
            vec!["alpha".to_string(), "beta".to_string()],
            StubNews::default(),
            StubSummarizer::default(),
            mailer.clone(),
        );

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, BriefingError::EmptyDigest));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_summaries_failing_fails_without_sending() {
        let mailer = RecordingMailer::default();
        let news = StubNews {
            articles: HashMap::from([(
                "alpha".to_string(),
                vec![article("One", Some("FAIL body"))],
            )]),
            ..Default::default()
        };
        let pipeline = Pipeline::new(
            vec!["alpha".to_string()],
            news,
            StubSummarizer::default(),
            mailer.clone(),
        );

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, BriefingError::EmptyDigest));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_article_is_skipped_not_fatal() {
        let mailer = RecordingMailer::default();
        let news = StubNews {
            articles: HashMap::from([(
                "alpha".to_string(),
                vec![
                    article("First", Some("body one")),
                    article("Second", Some("FAIL body")),
                    article("Third", Some("body three")),
                ],
            )]),
            ..Default::default()
        };
        let pipeline = Pipeline::new(
            vec!["alpha".to_string()],
            news,
            StubSummarizer::default(),
            mailer.clone(),
        );

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.articles_fetched, 3);
        assert_eq!(report.articles_summarized, 2);
        assert_eq!(report.articles_skipped, 1);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (_, html, _) = &sent[0];
        assert!(html.contains("First"));
        assert!(!html.contains("Second"));
        assert!(html.contains("Third"));
    }

    #[tokio::test]
    async fn test_article_without_text_never_reaches_the_model() {
        let mailer = RecordingMailer::default();
        let summarizer = StubSummarizer::default();
        let news = StubNews {
            articles: HashMap::from([(
                "alpha".to_string(),
                vec![article("Bare headline", None), article("Full", Some("body"))],
            )]),
            ..Default::default()
        };
        let pipeline = Pipeline::new(
            vec!["alpha".to_string()],
            news,
            summarizer.clone(),
            mailer.clone(),
        );

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.articles_skipped, 1);
        assert_eq!(report.articles_summarized, 1);

        let calls = summarizer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("Full"));
    }

    #[tokio::test]
    async fn test_failed_topic_is_skipped_not_fatal() {
        let mailer = RecordingMailer::default();
        let news = StubNews {
            articles: HashMap::from([(
                "good".to_string(),
                vec![article("Story", Some("body"))],
            )]),
            fail_topics: vec!["bad".to_string()],
        };
        let pipeline = Pipeline::new(
            vec!["bad".to_string(), "good".to_string()],
            news,
            StubSummarizer::default(),
            mailer.clone(),
        );

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.topics_queried, 2);
        assert_eq!(report.topics_failed, 1);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (_, html, _) = &sent[0];
        assert!(html.contains("Today's News on: good"));
        assert!(!html.contains("Today's News on: bad"));
    }

    #[tokio::test]
    async fn test_sends_exactly_one_email_with_rendered_digest() {
        let mailer = RecordingMailer::default();
        let news = StubNews {
            articles: HashMap::from([(
                "technology".to_string(),
                vec![Article {
                    title: "X".to_string(),
                    description: Some("teaser".to_string()),
                    url: "http://x".to_string(),
                    content: None,
                }],
            )]),
            ..Default::default()
        };
        let pipeline = Pipeline::new(
            vec!["technology".to_string()],
            news,
            ScriptedSummarizer("short summary"),
            mailer.clone(),
        );

        pipeline.run().await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (subject, html, text) = &sent[0];
        assert!(subject.starts_with("Your Daily AI News Briefing - "));
        let anchor = html
            .find("<a href=\"http://x\" style=\"color: #0056b3; text-decoration: none;\">X</a>")
            .expect("anchor missing");
        let summary = html.find("short summary").expect("summary missing");
        assert!(anchor < summary);
        assert!(text.contains("short summary"));
    }

    #[tokio::test]
    async fn test_delivery_failure_propagates() {
        let mailer = RecordingMailer {
            fail: true,
            ..Default::default()
        };
        let news = StubNews {
            articles: HashMap::from([(
                "alpha".to_string(),
                vec![article("Story", Some("body"))],
            )]),
            ..Default::default()
        };
        let pipeline = Pipeline::new(
            vec!["alpha".to_string()],
            news,
            StubSummarizer::default(),
            mailer,
        );

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, BriefingError::Delivery(_)));
    }
}
