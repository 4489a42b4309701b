use std::collections::HashMap;

use uuid::Uuid;

use crate::{Comment, CommentId, UserId, STUB_UUID};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ReactionId(pub Uuid);

impl ReactionId {
    pub fn stub() -> ReactionId {
        ReactionId(STUB_UUID)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Dislike,
}

/// One raw reaction row, as stored. At most one row exists per
/// (comment, user) pair; the toggle keeps it that way.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Reaction {
    pub id: ReactionId,
    pub comment_id: CommentId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: ReactionType,
}

/// Payload of the toggle endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ToggleReaction {
    pub comment: CommentId,
    #[serde(rename = "type")]
    pub kind: ReactionType,
}

/// Recomputes every comment's reaction summary from the raw rows.
///
/// `mine` is the requesting user's own subset of the rows; it is empty for
/// anonymous callers, which leaves every `user_reaction` at `None`.
/// Counting goes through keyed tallies so row order cannot affect the
/// result, and re-running on the same input yields the same annotations.
pub fn aggregate(mut comments: Vec<Comment>, reactions: &[Reaction], mine: &[Reaction]) -> Vec<Comment> {
    let mut tallies: HashMap<CommentId, (u64, u64)> = HashMap::new();
    for r in reactions {
        let t = tallies.entry(r.comment_id).or_default();
        match r.kind {
            ReactionType::Like => t.0 += 1,
            ReactionType::Dislike => t.1 += 1,
        }
    }

    let mut own: HashMap<CommentId, ReactionType> = HashMap::new();
    for r in mine {
        own.insert(r.comment_id, r.kind);
    }

    for c in comments.iter_mut() {
        let (likes, dislikes) = tallies.get(&c.id).copied().unwrap_or((0, 0));
        c.like_count = likes;
        c.dislike_count = dislikes;
        c.user_reaction = own.get(&c.id).copied();
    }
    comments
}
