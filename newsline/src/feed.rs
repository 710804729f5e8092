//! Feed model and ingestion.
//!
//! The document is a JSON array of themes, each holding specific points, each
//! backed by contributing tweets. Ingestion assigns every point a positional
//! [`PointId`] and parses every `posted_ist` once; the resulting [`Feed`] is
//! read-only.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{FeedError, Result};
use crate::timestamp::{parse_posted_at, TimestampParseError};

/// Positional identity of a point: `(theme index, point index)` in feed order.
///
/// Two points with identical content still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PointId {
    pub theme: usize,
    pub point: usize,
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.theme, self.point)
    }
}

/// Raw `posted_ist` value together with its parse outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedAt {
    pub raw: Option<String>,
    pub parsed: std::result::Result<NaiveDateTime, TimestampParseError>,
}

impl PostedAt {
    pub fn new(raw: Option<String>) -> Self {
        let parsed = parse_posted_at(raw.as_deref());
        Self { raw, parsed }
    }

    /// The parsed instant, or `None` when the timestamp is missing or malformed.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        self.parsed.as_ref().ok().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tweet {
    pub posted: PostedAt,
    pub link: Option<String>,
    pub content: Option<String>,
    pub associated_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecificPoint {
    pub id: PointId,
    pub summary: Option<String>,
    pub tweets: Vec<Tweet>,
}

impl SpecificPoint {
    /// Parsed instants of this point's tweets, skipping unparseable ones.
    pub fn instants(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.tweets.iter().filter_map(|t| t.posted.instant())
    }

    /// True when any tweet was posted at or after `start`.
    pub fn touched_since(&self, start: NaiveDateTime) -> bool {
        self.instants().any(|instant| instant >= start)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub index: usize,
    pub name: Option<String>,
    pub points: Vec<SpecificPoint>,
}

impl Theme {
    /// The theme name, or "Unnamed Theme N" (1-based) when absent or blank.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Unnamed Theme {}", self.index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub themes: Vec<Theme>,
}

impl Feed {
    /// Build a feed from an already-parsed JSON document.
    ///
    /// Fails with `InvalidStructure` when the value is not an array of theme
    /// objects, and with `Empty` for an empty array.
    pub fn from_value(value: Value) -> Result<Self> {
        let themes = match value {
            Value::Array(items) if items.is_empty() => return Err(FeedError::Empty),
            Value::Array(items) => serde_json::from_value::<Vec<RawTheme>>(Value::Array(items))
                .map_err(|e| FeedError::InvalidStructure(e.to_string()))?,
            other => {
                return Err(FeedError::InvalidStructure(format!(
                    "expected an array of themes, found {}",
                    json_kind(&other)
                )))
            }
        };

        let themes = themes
            .into_iter()
            .enumerate()
            .map(|(theme_idx, raw)| raw.into_theme(theme_idx))
            .collect::<Vec<_>>();

        debug!(themes = themes.len(), "feed ingested");
        Ok(Self { themes })
    }

    pub fn points(&self) -> impl Iterator<Item = &SpecificPoint> {
        self.themes.iter().flat_map(|t| t.points.iter())
    }

    pub fn tweets(&self) -> impl Iterator<Item = &Tweet> {
        self.points().flat_map(|p| p.tweets.iter())
    }

    pub fn point_count(&self) -> usize {
        self.themes.iter().map(|t| t.points.len()).sum()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// Wire shapes. Every field is optional; a `null` list counts as empty.

#[derive(Debug, Deserialize)]
struct RawTheme {
    #[serde(default)]
    theme_name: Option<String>,
    #[serde(default)]
    specific_points: Option<Vec<RawPoint>>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    #[serde(default)]
    point_summary: Option<String>,
    #[serde(default)]
    contributing_tweets: Option<Vec<RawTweet>>,
}

#[derive(Debug, Deserialize)]
struct RawTweet {
    #[serde(default)]
    posted_ist: Option<String>,
    #[serde(default)]
    tweet_link: Option<String>,
    #[serde(default)]
    tweet_content: Option<String>,
    #[serde(default)]
    associated_embedded_links: Option<Vec<String>>,
}

impl RawTheme {
    fn into_theme(self, theme_idx: usize) -> Theme {
        let points = self
            .specific_points
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(point_idx, raw)| SpecificPoint {
                id: PointId {
                    theme: theme_idx,
                    point: point_idx,
                },
                summary: raw.point_summary,
                tweets: raw
                    .contributing_tweets
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawTweet::into_tweet)
                    .collect(),
            })
            .collect();

        Theme {
            index: theme_idx,
            name: self.theme_name,
            points,
        }
    }
}

impl RawTweet {
    fn into_tweet(self) -> Tweet {
        let posted = PostedAt::new(self.posted_ist);
        if let Err(e) = &posted.parsed {
            warn!(error = %e, "tweet timestamp ignored for time windowing");
        }
        Tweet {
            posted,
            link: self.tweet_link,
            content: self.tweet_content,
            associated_links: self.associated_embedded_links.unwrap_or_default(),
        }
    }
}
