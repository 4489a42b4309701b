use std::cmp::Reverse;

use crate::Comment;

/// Caller-facing ordering of the feed, applied to the root sequence after
/// the forest is built. Reply order is never re-sorted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrder {
    /// Newest top-level comments first.
    Recent,
    /// Highest net score first, newest first among equals.
    Top,
}

impl FeedOrder {
    // Stable sorts: fully equal keys keep store-return order.
    pub fn sort(&self, roots: &mut [Comment]) {
        match self {
            FeedOrder::Recent => roots.sort_by_key(|c| Reverse(c.timestamp)),
            FeedOrder::Top => roots.sort_by_key(|c| {
                Reverse((c.like_count as i64 - c.dislike_count as i64, c.timestamp))
            }),
        }
    }
}
