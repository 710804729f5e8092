use crate::feed::Tweet;

/// Tweets per point shown in full unless configured otherwise.
pub const FULL_DISPLAY_COUNT: usize = 2;

/// A point's tweets split by position: the first `n` in full, the rest as links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweetSelection<'a> {
    pub fully_shown: &'a [Tweet],
    pub link_only: &'a [Tweet],
}

/// Split `tweets` after the first `full_display_count` entries. Order is kept as-is.
pub fn select_tweets(tweets: &[Tweet], full_display_count: usize) -> TweetSelection<'_> {
    let (fully_shown, link_only) = tweets.split_at(full_display_count.min(tweets.len()));
    TweetSelection {
        fully_shown,
        link_only,
    }
}
