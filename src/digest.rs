//! Digest rendering: the HTML briefing and its plain-text alternative.
//!
//! Pure string assembly. Both renderers take the collected topic sections
//! and nothing else, so the same input always yields the same bytes; the
//! subject line takes the date as an argument for the same reason. Topics
//! appear in configuration order, entries in fetch order.
//!
//! All interpolated values are HTML-escaped here, at the last moment before
//! markup assembly. Upstream stages keep text raw.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::TopicSection;

/// Heading at the top of the briefing.
const HEADING: &str = "Your AI-Powered News Briefing";

/// Intro line under the heading.
const INTRO: &str = "Here are the top stories for today:";

/// Subject line for the briefing sent on `date`.
pub fn subject(date: NaiveDate) -> String {
    format!("Your Daily AI News Briefing - {}", date.format("%B %d, %Y"))
}

/// Render the full HTML briefing.
///
/// Sections without a single summary are omitted entirely; a topic that
/// produced nothing gets no heading.
pub fn render_html(sections: &[TopicSection]) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<h1>{HEADING}</h1><p>{INTRO}</p>");

    for section in sections {
        if section.summaries.is_empty() {
            continue;
        }
        let _ = writeln!(html, "<h2>Today's News on: {}</h2>", html_escape(&section.topic));
        for summary in &section.summaries {
            let _ = writeln!(
                html,
                "<div style=\"margin-bottom: 25px; border-bottom: 1px solid #eee; padding-bottom: 15px;\"><h3 style=\"margin: 0 0 5px 0;\"><a href=\"{url}\" style=\"color: #0056b3; text-decoration: none;\">{title}</a></h3><p style=\"margin: 0; font-size: 16px;\">{text}</p></div>",
                url = html_escape(&summary.url),
                title = html_escape(&summary.title),
                text = html_escape(&summary.text),
            );
        }
    }

    html
}

/// Render the plain-text alternative carried alongside the HTML part.
pub fn render_text(sections: &[TopicSection]) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{HEADING}");
    let _ = writeln!(text, "{INTRO}");

    for section in sections {
        if section.summaries.is_empty() {
            continue;
        }
        let _ = writeln!(text);
        let _ = writeln!(text, "Today's News on: {}", section.topic);
        let _ = writeln!(text, "{}", "-".repeat(40));
        for summary in &section.summaries {
            let _ = writeln!(text);
            let _ = writeln!(text, "{}", summary.title);
            let _ = writeln!(text, "{}", summary.text);
            let _ = writeln!(text, "{}", summary.url);
        }
    }

    text
}

/// Escape HTML special characters for safe insertion into markup.
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Summary;

    fn section(topic: &str, entries: &[(&str, &str, &str)]) -> TopicSection {
        TopicSection {
            topic: topic.to_string(),
            summaries: entries
                .iter()
                .map(|(title, url, text)| Summary {
                    title: title.to_string(),
                    url: url.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_subject_formats_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(subject(date), "Your Daily AI News Briefing - August 25, 2026");
    }

    #[test]
    fn test_subject_zero_pads_day() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(subject(date), "Your Daily AI News Briefing - August 05, 2026");
    }

    #[test]
    fn test_render_html_single_entry() {
        let sections = vec![section(
            "technology",
            &[("X", "http://x", "short summary")],
        )];
        let html = render_html(&sections);

        assert!(html.contains("<h1>Your AI-Powered News Briefing</h1>"));
        assert!(html.contains("<h2>Today's News on: technology</h2>"));
        let anchor = html
            .find("<a href=\"http://x\" style=\"color: #0056b3; text-decoration: none;\">X</a>")
            .expect("anchor missing");
        let summary = html.find("short summary").expect("summary missing");
        assert!(anchor < summary, "summary should follow its headline");
    }

    #[test]
    fn test_render_html_is_deterministic() {
        let sections = vec![
            section("alpha", &[("A", "http://a", "first")]),
            section("beta", &[("B", "http://b", "second")]),
        ];
        assert_eq!(render_html(&sections), render_html(&sections));
    }

    #[test]
    fn test_render_html_preserves_order() {
        let sections = vec![
            section("alpha", &[("A1", "http://a1", "s1"), ("A2", "http://a2", "s2")]),
            section("beta", &[("B1", "http://b1", "s3")]),
        ];
        let html = render_html(&sections);

        let alpha = html.find("Today's News on: alpha").unwrap();
        let a1 = html.find("A1").unwrap();
        let a2 = html.find("A2").unwrap();
        let beta = html.find("Today's News on: beta").unwrap();
        assert!(alpha < a1 && a1 < a2 && a2 < beta);
    }

    #[test]
    fn test_render_html_escapes_markup() {
        let sections = vec![section(
            "security",
            &[("<script>alert(\"x\")</script>", "http://x?a=1&b=2", "a & b")],
        )];
        let html = render_html(&sections);

        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"));
        assert!(html.contains("http://x?a=1&amp;b=2"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_html_skips_sections_without_summaries() {
        let sections = vec![
            section("empty topic", &[]),
            section("full topic", &[("T", "http://t", "text")]),
        ];
        let html = render_html(&sections);

        assert!(!html.contains("empty topic"));
        assert!(html.contains("Today's News on: full topic"));
    }

    #[test]
    fn test_render_text_contains_entries() {
        let sections = vec![section(
            "technology",
            &[("X", "http://x", "short summary")],
        )];
        let text = render_text(&sections);

        assert!(text.starts_with("Your AI-Powered News Briefing\n"));
        assert!(text.contains("Today's News on: technology"));
        assert!(text.contains("short summary"));
        assert!(text.contains("http://x"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("<tag>"), "&lt;tag&gt;");
        assert_eq!(html_escape("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(html_escape("plain"), "plain");
    }
}
