//! Splits a feed into "latest" and "past" buckets.
//!
//! A point is latest when any of its tweets was posted inside the trailing
//! window that ends at the newest timestamp in the feed. The window start is
//! inclusive. Latest membership is recorded by [`PointId`], and the past pass
//! takes every point that was not recorded, so each point lands in exactly
//! one bucket.

use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;
use tracing::debug;

use crate::feed::{Feed, PointId, SpecificPoint, Theme};

/// Default length of the "latest" window.
pub fn default_window() -> Duration {
    Duration::hours(2)
}

/// One theme's share of a bucket, points in feed order.
#[derive(Debug, Clone)]
pub struct ThemeBucket<'a> {
    pub theme: &'a Theme,
    pub points: Vec<&'a SpecificPoint>,
}

#[derive(Debug, Clone)]
pub struct Partition<'a> {
    /// Inclusive lower bound of the window, `None` when the feed has no parsed timestamp.
    pub window_start: Option<NaiveDateTime>,
    /// Themes with at least one latest point, in feed order.
    pub latest: Vec<ThemeBucket<'a>>,
    /// Themes with at least one remaining point, in feed order.
    pub past: Vec<ThemeBucket<'a>>,
    shown: HashSet<PointId>,
}

impl<'a> Partition<'a> {
    pub fn latest_count(&self) -> usize {
        self.shown.len()
    }

    pub fn past_count(&self) -> usize {
        self.past.iter().map(|b| b.points.len()).sum()
    }
}

/// Partition `feed` around `newest` (the dataset's max timestamp).
///
/// With no anchor every point is past.
pub fn partition(feed: &Feed, newest: Option<NaiveDateTime>, window: Duration) -> Partition<'_> {
    // An anchor too close to the calendar minimum puts the whole feed in the window.
    let window_start = newest.map(|n| n.checked_sub_signed(window).unwrap_or(NaiveDateTime::MIN));

    let mut shown = HashSet::new();
    let mut latest = Vec::new();

    if let Some(start) = window_start {
        for theme in &feed.themes {
            let points: Vec<&SpecificPoint> = theme
                .points
                .iter()
                .filter(|p| p.touched_since(start))
                .collect();

            if points.is_empty() {
                continue;
            }
            shown.extend(points.iter().map(|p| p.id));
            debug!(theme = theme.index, latest = points.len(), "theme has recent points");
            latest.push(ThemeBucket { theme, points });
        }
    }

    let past = feed
        .themes
        .iter()
        .filter_map(|theme| {
            let points: Vec<&SpecificPoint> = theme
                .points
                .iter()
                .filter(|p| !shown.contains(&p.id))
                .collect();
            (!points.is_empty()).then_some(ThemeBucket { theme, points })
        })
        .collect();

    Partition {
        window_start,
        latest,
        past,
        shown,
    }
}
