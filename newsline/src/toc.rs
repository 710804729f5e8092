use crate::feed::{Feed, Theme};

/// Theme display names in feed order, one per theme, duplicates included.
pub fn table_of_contents(feed: &Feed) -> Vec<String> {
    feed.themes.iter().map(Theme::display_name).collect()
}
