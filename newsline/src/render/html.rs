//! HTML page renderer.
//!
//! Produces a single self-contained document with inline styles taken from
//! [`StyleConfig`]. All feed text goes through [`escape_html`]; hrefs are only
//! emitted for http(s) URLs.

use common::{PageConfig, StyleConfig};
use url::Url;

use crate::time_range::TimeRangeSummary;
use crate::timeline::{PageState, PointView, ThemeView, Timeline, TweetView, Untrusted};

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escaped href for http(s) links, `None` for anything else (including `javascript:`).
pub fn safe_href(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| escape_html(raw.trim()))
}

/// Human form of the window length: "2 hours", "1 hour", "90 minutes".
pub fn window_label(minutes: i64) -> String {
    match minutes {
        60 => "1 hour".to_string(),
        m if m % 60 == 0 => format!("{} hours", m / 60),
        1 => "1 minute".to_string(),
        m => format!("{} minutes", m),
    }
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn esc(text: &Untrusted) -> String {
    escape_html(text.as_raw())
}

pub struct HtmlRenderer<'a> {
    page: &'a PageConfig,
    style: &'a StyleConfig,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(page: &'a PageConfig, style: &'a StyleConfig) -> Self {
        Self { page, style }
    }

    /// Render a complete HTML document for `state`.
    pub fn render(&self, state: &PageState) -> String {
        let mut out = String::new();
        let title = escape_html(&self.page.title);

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n</head>\n", title));
        out.push_str("<body style='font-family: sans-serif; max-width: 70em; margin: 0 auto; padding: 1em;'>\n");
        out.push_str(&format!("<h1>{}</h1>\n", title));
        out.push_str(&format!(
            "<p style='color:{}; font-size: 0.9em;'>{}</p>\n",
            self.style.tweet_metadata,
            escape_html(&self.page.caption)
        ));

        match state {
            PageState::Ready(timeline) => {
                self.time_range(&mut out, &timeline.time_range);
                self.timeline(&mut out, timeline);
            }
            PageState::Unavailable { reason } => {
                self.time_range(&mut out, &TimeRangeSummary::Unavailable);
                self.notice(
                    &mut out,
                    "News data could not be loaded. Please ensure the feed document is valid and present.",
                    Some(reason.as_str()),
                );
            }
            PageState::Invalid { reason } => {
                self.time_range(&mut out, &TimeRangeSummary::Unavailable);
                self.notice(&mut out, "JSON data is not a valid list or is empty.", Some(reason.as_str()));
            }
            PageState::Empty => {
                self.time_range(&mut out, &TimeRangeSummary::Unavailable);
                self.notice(&mut out, "No news data to display.", None);
            }
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    fn notice(&self, out: &mut String, message: &str, detail: Option<&str>) {
        out.push_str(&format!(
            "<p class='notice' style='padding: 0.75em 1em; background-color:{}; border-radius: 4px;'>{}</p>\n",
            self.style.tweet_content_bg,
            escape_html(message)
        ));
        if let Some(detail) = detail {
            out.push_str(&format!(
                "<p style='color:{}; font-size: 0.85em;'><code>{}</code></p>\n",
                self.style.tweet_metadata,
                escape_html(detail)
            ));
        }
    }

    fn time_range(&self, out: &mut String, summary: &TimeRangeSummary) {
        let value_style = format!(
            "color:{}; background-color:{}; padding: 0.2em 0.4em; border-radius: 0.2rem; font-family: monospace;",
            self.style.top_ts_value_text, self.style.top_ts_value_bg
        );
        let label_style = format!("color:{}; font-weight:bold;", self.style.top_ts_label);

        let text = match summary {
            TimeRangeSummary::AsOf { at } => format!(
                "<span style='{label_style}'>News as of:</span> <span style='{value_style}'>{}</span>",
                escape_html(at)
            ),
            TimeRangeSummary::Range { from, to } => format!(
                "<span style='{label_style}'>News from:</span> <span style='{value_style}'>{}</span> \
                 <span style='{label_style}'>to</span> <span style='{value_style}'>{}</span>",
                escape_html(from),
                escape_html(to)
            ),
            TimeRangeSummary::Unavailable => {
                out.push_str(&format!(
                    "<p style='font-size: 1.05em; color:{}; font-style:italic;'>Timestamp range not available.</p>\n",
                    self.style.tweet_metadata
                ));
                return;
            }
        };
        out.push_str(&format!("<p style='font-size: 1.05em;'>{}</p>\n", text));
    }

    fn timeline(&self, out: &mut String, timeline: &Timeline) {
        let window = window_label(timeline.window_minutes);

        out.push_str("<hr>\n");
        out.push_str(&format!(
            "<h4 style='margin-bottom: 0.3em; color: {};'>Themes Covered:</h4>\n",
            self.style.theme_header
        ));
        out.push_str("<ul class='toc' style='list-style: disc; padding-left: 20px;'>\n");
        for name in &timeline.table_of_contents {
            out.push_str(&format!(
                "<li style='color: {}; font-size: 0.95em;'>{}</li>\n",
                self.style.toc_item_text,
                esc(name)
            ));
        }
        out.push_str("</ul>\n");

        // Latest
        out.push_str(&format!(
            "<h1 style='color: {c}; text-align:center; border-bottom: 2px solid {c}; padding-bottom:0.3em;'>Latest News (Past {})</h1>\n",
            capitalize_words(&window),
            c = self.style.latest_header
        ));
        for theme in &timeline.latest {
            out.push_str(&format!(
                "<h2 style='color: {}; font-size: 1.6em;'>{}</h2>\n",
                self.style.theme_name_in_latest,
                esc(&theme.name)
            ));
            out.push_str(&format!(
                "<p style='font-style:italic; font-size:0.85em; color:{};'>Updates from the past {} for this theme.</p>\n",
                self.style.tweet_metadata, window
            ));
            self.points(out, theme, "<hr style='border-top: 1px dashed #ddd;'>\n");
        }
        if timeline.latest.is_empty() {
            self.caption(
                out,
                &format!("No news updates found in the past {} across all themes.", window),
            );
        }

        // Past
        out.push_str(&format!(
            "<h1 style='color: {c}; text-align:center; border-bottom: 2px solid {c}; padding-bottom:0.3em;'>Past News</h1>\n",
            c = self.style.past_header
        ));
        for theme in &timeline.past {
            out.push_str(&format!(
                "<h2 style='color: {c}; border-bottom: 2px solid {c}; padding-bottom: 0.3em;'>{}</h2>\n",
                esc(&theme.name),
                c = self.style.theme_header
            ));
            self.points(out, theme, "<hr>\n");
        }
        match (timeline.latest.is_empty(), timeline.past.is_empty()) {
            (false, true) => self.caption(
                out,
                "All news updates were recent and shown in the 'Latest News' section above.",
            ),
            (true, true) => self.caption(out, "No news data to display in Past News."),
            _ => {}
        }
    }

    fn caption(&self, out: &mut String, text: &str) {
        out.push_str(&format!(
            "<p class='caption' style='color:{}; font-size: 0.9em;'>{}</p>\n",
            self.style.tweet_metadata,
            escape_html(text)
        ));
    }

    fn points(&self, out: &mut String, theme: &ThemeView, separator: &str) {
        for (idx, point) in theme.points.iter().enumerate() {
            if idx > 0 {
                out.push_str(separator);
            }
            self.point(out, point);
        }
    }

    fn point(&self, out: &mut String, point: &PointView) {
        let summary = match &point.summary {
            Some(s) if !s.is_blank() => esc(s),
            _ => "Specific Point Details".to_string(),
        };
        out.push_str(&format!(
            "<h3 id='point-{}' style='color: {}; font-size: 1.2em; font-weight: 600;'>{}</h3>\n",
            point.id, self.style.summary_subheader, summary
        ));

        for tweet in &point.fully_shown {
            self.full_tweet(out, tweet);
        }

        if !point.link_only.is_empty() {
            out.push_str(&format!(
                "<p style='font-weight:bold; margin-top:0.8em; color:{};'>Other Supporting Tweets for this Point:</p>\n",
                self.style.tweet_metadata
            ));
            out.push_str("<ul style='list-style-type: disc; padding-left: 20px;'>\n");
            for tweet in &point.link_only {
                self.linked_tweet(out, tweet);
            }
            out.push_str("</ul>\n");
        }
    }

    fn full_tweet(&self, out: &mut String, tweet: &TweetView) {
        let posted = tweet.posted_raw.as_ref().map(esc).unwrap_or_else(|| "N/A".to_string());
        out.push_str("<div class='tweet'>\n");
        out.push_str(&format!(
            "<span style='color:{}; font-size: 0.9em;'><strong>Posted:</strong> <code>{}</code></span>",
            self.style.tweet_metadata, posted
        ));

        if let Some(link) = tweet.link.as_ref().filter(|l| !l.is_blank()) {
            let text = esc(link);
            let href = safe_href(link.as_raw()).unwrap_or_else(|| "#".to_string());
            out.push_str(&format!(
                " <span style='color:{}; font-size: 0.9em;'><strong>Tweet Link:</strong> \
                 <a href='{}' style='color:{};' target='_blank' rel='noopener'>{}</a></span>",
                self.style.tweet_metadata, href, self.style.tweet_link_primary, text
            ));
        }
        out.push('\n');

        let content = tweet
            .content
            .as_ref()
            .map(Untrusted::as_raw)
            .unwrap_or("No content available.");
        if !content.trim().is_empty() {
            out.push_str(&format!(
                "<div style='color:{}; background-color:{}; border-left: 4px solid {}; padding: 0.75em 1em; margin: 0.5em 0; border-radius: 4px;'>{}</div>\n",
                self.style.tweet_content_text,
                self.style.tweet_content_bg,
                self.style.tweet_link_primary,
                escape_html(content).replace('\n', "<br>")
            ));
        }

        if !tweet.associated_links.is_empty() {
            let links: Vec<String> = tweet
                .associated_links
                .iter()
                .enumerate()
                .map(|(i, link)| {
                    let href = safe_href(link.as_raw()).unwrap_or_else(|| "#".to_string());
                    format!(
                        "<a href='{}' style='color:{};' target='_blank' rel='noopener'>[{}]</a>",
                        href,
                        self.style.associated_link,
                        i + 1
                    )
                })
                .collect();
            out.push_str(&format!(
                "<span style='color:{}; font-size: 0.9em;'><strong>Associated:</strong> {}</span>\n",
                self.style.tweet_metadata,
                links.join(", ")
            ));
        }
        out.push_str("</div>\n");
    }

    fn linked_tweet(&self, out: &mut String, tweet: &TweetView) {
        let posted = tweet.posted_raw.as_ref().map(Untrusted::as_raw).unwrap_or("N/A");
        let content = tweet
            .content
            .as_ref()
            .map(Untrusted::as_raw)
            .unwrap_or("No content.");
        let hover = escape_html(&format!("Posted: {}\n{}", posted, content.replace('\n', " ")));

        let link = tweet.link.as_ref().filter(|l| !l.is_blank());
        let text = link.map(esc).unwrap_or_else(|| "Link not available".to_string());
        let href = link
            .and_then(|l| safe_href(l.as_raw()))
            .unwrap_or_else(|| "#".to_string());

        out.push_str(&format!(
            "<li><a href='{}' title=\"{}\" style='color:{};' target='_blank' rel='noopener'>{}</a></li>\n",
            href, hover, self.style.tweet_link_secondary, text
        ));
    }
}
