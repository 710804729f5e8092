use chrono::NaiveDateTime;
use serde::Serialize;

use crate::feed::Feed;
use crate::timestamp::format_instant;

/// A parsed instant paired with its display form ("May 10, 2025, 02:00 PM IST").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub instant: NaiveDateTime,
    pub display: String,
}

impl Stamp {
    fn new(instant: NaiveDateTime) -> Self {
        Self {
            display: format_instant(&instant),
            instant,
        }
    }
}

/// Oldest and newest parsed timestamps across the whole feed.
///
/// Both are `None` when no tweet timestamp parses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeWindowInfo {
    pub oldest: Option<Stamp>,
    pub newest: Option<Stamp>,
}

impl TimeWindowInfo {
    pub fn from_feed(feed: &Feed) -> Self {
        Self::from_instants(feed.tweets().filter_map(|t| t.posted.instant()))
    }

    pub fn from_instants<I>(instants: I) -> Self
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let bounds = instants.into_iter().fold(None, |acc, instant| match acc {
            None => Some((instant, instant)),
            Some((lo, hi)) => Some((lo.min(instant), hi.max(instant))),
        });

        match bounds {
            Some((lo, hi)) => Self {
                oldest: Some(Stamp::new(lo)),
                newest: Some(Stamp::new(hi)),
            },
            None => Self::default(),
        }
    }

    /// The window anchor: the newest instant in the dataset.
    pub fn anchor(&self) -> Option<NaiveDateTime> {
        self.newest.as_ref().map(|s| s.instant)
    }

    pub fn summary(&self) -> TimeRangeSummary {
        match (&self.oldest, &self.newest) {
            (Some(oldest), Some(newest)) if oldest.instant == newest.instant => {
                TimeRangeSummary::AsOf {
                    at: newest.display.clone(),
                }
            }
            (Some(oldest), Some(newest)) => TimeRangeSummary::Range {
                from: oldest.display.clone(),
                to: newest.display.clone(),
            },
            _ => TimeRangeSummary::Unavailable,
        }
    }
}

/// Top-of-page message describing the dataset's time span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeRangeSummary {
    /// Every parsed timestamp is the same instant: "News as of: …"
    AsOf { at: String },
    /// "News from: … to …"
    Range { from: String, to: String },
    /// No timestamp parsed: "Timestamp range not available."
    Unavailable,
}
