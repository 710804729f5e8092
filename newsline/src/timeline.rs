//! Assembly of the render-ready page model.
//!
//! Everything copied out of the feed document is wrapped in [`Untrusted`]:
//! renderers must escape it for their output context before embedding it.

use chrono::Duration;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use common::TimelineConfig;

use crate::error::FeedError;
use crate::feed::{Feed, PointId, SpecificPoint, Tweet};
use crate::partition::{default_window, partition, ThemeBucket};
use crate::selection::{select_tweets, FULL_DISPLAY_COUNT};
use crate::time_range::{TimeRangeSummary, TimeWindowInfo};
use crate::toc::table_of_contents;

/// Raw text taken from the feed document, not yet escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Untrusted(String);

impl Untrusted {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_raw(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Untrusted {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Untrusted {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Knobs for windowing and tweet selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    pub window: Duration,
    pub full_display_count: usize,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            window: default_window(),
            full_display_count: FULL_DISPLAY_COUNT,
        }
    }
}

impl From<&TimelineConfig> for TimelineOptions {
    fn from(cfg: &TimelineConfig) -> Self {
        Self {
            // Out-of-range windows cover the whole feed
            window: Duration::try_minutes(cfg.window_minutes).unwrap_or(Duration::MAX),
            full_display_count: cfg.full_display_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TweetView {
    /// `posted_ist` exactly as it appeared in the document
    pub posted_raw: Option<Untrusted>,
    /// Normalized display form, present only when the timestamp parsed
    pub posted_at: Option<String>,
    pub link: Option<Untrusted>,
    pub content: Option<Untrusted>,
    pub associated_links: Vec<Untrusted>,
}

impl From<&Tweet> for TweetView {
    fn from(tweet: &Tweet) -> Self {
        Self {
            posted_raw: tweet.posted.raw.as_deref().map(Untrusted::from),
            posted_at: tweet
                .posted
                .instant()
                .map(|i| crate::timestamp::format_instant(&i)),
            link: tweet.link.as_deref().map(Untrusted::from),
            content: tweet.content.as_deref().map(Untrusted::from),
            associated_links: tweet
                .associated_links
                .iter()
                .map(|l| Untrusted::from(l.as_str()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointView {
    pub id: PointId,
    pub summary: Option<Untrusted>,
    pub fully_shown: Vec<TweetView>,
    pub link_only: Vec<TweetView>,
}

impl PointView {
    fn new(point: &SpecificPoint, full_display_count: usize) -> Self {
        let selection = select_tweets(&point.tweets, full_display_count);
        Self {
            id: point.id,
            summary: point.summary.as_deref().map(Untrusted::from),
            fully_shown: selection.fully_shown.iter().map(TweetView::from).collect(),
            link_only: selection.link_only.iter().map(TweetView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeView {
    pub index: usize,
    pub name: Untrusted,
    pub points: Vec<PointView>,
}

impl ThemeView {
    fn new(bucket: &ThemeBucket<'_>, full_display_count: usize) -> Self {
        Self {
            index: bucket.theme.index,
            name: Untrusted::new(bucket.theme.display_name()),
            points: bucket
                .points
                .iter()
                .map(|p| PointView::new(p, full_display_count))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub time_range: TimeRangeSummary,
    pub table_of_contents: Vec<Untrusted>,
    pub window_minutes: i64,
    /// Empty when no theme has a recent point; the section is then omitted.
    pub latest: Vec<ThemeView>,
    pub past: Vec<ThemeView>,
}

impl Timeline {
    pub fn point_count(&self) -> usize {
        self.latest
            .iter()
            .chain(&self.past)
            .map(|t| t.points.len())
            .sum()
    }
}

/// What the renderer receives. The non-`Ready` states are mutually exclusive
/// and checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState {
    Unavailable { reason: String },
    Invalid { reason: String },
    Empty,
    Ready(Timeline),
}

impl PageState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PageState::Ready(_))
    }
}

impl From<FeedError> for PageState {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::DocumentUnavailable(reason) => PageState::Unavailable { reason },
            FeedError::InvalidStructure(reason) => PageState::Invalid { reason },
            FeedError::Empty => PageState::Empty,
        }
    }
}

/// Run the whole pipeline over a loaded (or failed) document.
pub fn build_page(document: Result<Value, FeedError>, options: &TimelineOptions) -> PageState {
    match document.and_then(Feed::from_value) {
        Ok(feed) => PageState::Ready(assemble(&feed, options)),
        Err(e) => e.into(),
    }
}

/// Combine time range, table of contents and both sections for a valid feed.
pub fn assemble(feed: &Feed, options: &TimelineOptions) -> Timeline {
    let range = TimeWindowInfo::from_feed(feed);
    let split = partition(feed, range.anchor(), options.window);

    let latest: Vec<ThemeView> = split
        .latest
        .iter()
        .map(|b| ThemeView::new(b, options.full_display_count))
        .collect();
    let past: Vec<ThemeView> = split
        .past
        .iter()
        .map(|b| ThemeView::new(b, options.full_display_count))
        .collect();

    info!(
        themes = feed.themes.len(),
        window_start = ?split.window_start,
        latest_points = split.latest_count(),
        past_points = split.past_count(),
        "timeline assembled"
    );

    Timeline {
        time_range: range.summary(),
        table_of_contents: table_of_contents(feed)
            .into_iter()
            .map(Untrusted::from)
            .collect(),
        window_minutes: options.window.num_minutes(),
        latest,
        past,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ready(page: PageState) -> Timeline {
        match page {
            PageState::Ready(timeline) => timeline,
            other => panic!("expected a ready page, got {other:?}"),
        }
    }

    #[test]
    fn terminal_states_take_priority() {
        let opts = TimelineOptions::default();
        assert_eq!(
            build_page(Err(FeedError::DocumentUnavailable("gone".into())), &opts),
            PageState::Unavailable {
                reason: "gone".into()
            }
        );
        assert!(matches!(
            build_page(Ok(json!({ "themes": [] })), &opts),
            PageState::Invalid { .. }
        ));
        assert_eq!(build_page(Ok(json!([])), &opts), PageState::Empty);
    }

    #[test]
    fn unparseable_tweet_is_displayed_with_raw_timestamp() {
        let timeline = ready(build_page(
            Ok(json!([
                { "theme_name": "Ceasefire", "specific_points": [
                    { "point_summary": "Talks", "contributing_tweets": [
                        { "posted_ist": "sometime", "tweet_content": "<b>hi</b>" },
                        { "posted_ist": "May 10, 2025, 2:00 PM IST" }
                    ]}
                ]}
            ])),
            &TimelineOptions::default(),
        ));

        assert_eq!(
            timeline.time_range,
            TimeRangeSummary::AsOf {
                at: "May 10, 2025, 02:00 PM IST".into()
            }
        );
        let point = &timeline.latest[0].points[0];
        assert_eq!(point.fully_shown.len(), 2);
        let odd = &point.fully_shown[0];
        assert_eq!(odd.posted_raw, Some(Untrusted::from("sometime")));
        assert_eq!(odd.posted_at, None);
        // Text is carried unescaped
        assert_eq!(odd.content.as_ref().map(Untrusted::as_raw), Some("<b>hi</b>"));
    }

    #[test]
    fn selection_applies_in_both_sections() {
        let tweets = |posted: &str| {
            json!([
                { "posted_ist": posted, "tweet_link": "https://x.com/a/1" },
                { "posted_ist": posted, "tweet_link": "https://x.com/a/2" },
                { "posted_ist": posted, "tweet_link": "https://x.com/a/3" }
            ])
        };
        let timeline = ready(build_page(
            Ok(json!([
                { "specific_points": [
                    { "contributing_tweets": tweets("May 10, 2025, 2:00 PM IST") },
                    { "contributing_tweets": tweets("May 10, 2025, 10:00 AM IST") }
                ]}
            ])),
            &TimelineOptions::default(),
        ));

        for section in [&timeline.latest, &timeline.past] {
            let point = &section[0].points[0];
            assert_eq!(point.fully_shown.len(), 2);
            assert_eq!(point.link_only.len(), 1);
            assert_eq!(
                point.link_only[0].link.as_ref().map(Untrusted::as_raw),
                Some("https://x.com/a/3")
            );
        }
        assert_eq!(timeline.point_count(), 2);
    }

    #[test]
    fn options_follow_config() {
        let cfg = TimelineConfig {
            window_minutes: 45,
            full_display_count: 1,
        };
        let opts = TimelineOptions::from(&cfg);
        assert_eq!(opts.window, Duration::minutes(45));
        assert_eq!(opts.full_display_count, 1);
        assert_eq!(TimelineOptions::default().window, Duration::hours(2));
    }

    #[test]
    fn oversized_window_puts_everything_in_latest() {
        let cfg = TimelineConfig {
            window_minutes: i64::MAX,
            full_display_count: 2,
        };
        let opts = TimelineOptions::from(&cfg);
        assert_eq!(opts.window, Duration::MAX);

        let timeline = ready(build_page(
            Ok(json!([
                { "specific_points": [
                    { "contributing_tweets": [ { "posted_ist": "May 10, 2025, 2:00 PM IST" } ] },
                    { "contributing_tweets": [ { "posted_ist": "Jan 01, 2001, 2:00 PM IST" } ] }
                ]}
            ])),
            &opts,
        ));
        assert_eq!(timeline.latest[0].points.len(), 2);
        assert!(timeline.past.is_empty());
    }

    #[test]
    fn serializes_with_state_tag() {
        let value = serde_json::to_value(PageState::Empty).expect("json");
        assert_eq!(value, json!({ "state": "empty" }));

        let timeline = ready(build_page(
            Ok(json!([{ "theme_name": "A", "specific_points": [] }])),
            &TimelineOptions::default(),
        ));
        let value = serde_json::to_value(PageState::Ready(timeline)).expect("json");
        assert_eq!(value["state"], "ready");
        assert_eq!(value["table_of_contents"], json!(["A"]));
        assert_eq!(value["time_range"], json!({ "kind": "unavailable" }));
    }
}
