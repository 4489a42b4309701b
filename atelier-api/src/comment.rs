use std::collections::HashMap;

use uuid::Uuid;

use crate::{Error, ProjectId, ReactionType, Time, STUB_UUID};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// One comment as served to the caller, annotated with its reaction
/// summary and, for top-level comments, the replies threaded under it.
///
/// Serialized camelCase, this is the wire contract of the feed endpoint.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub project_id: ProjectId,

    /// Author display name, resolved at fetch time; "Anonymous" when the
    /// store has no user attached to the row.
    pub author: String,
    pub content: String,

    /// Creation instant, for sort/display only. Authoritative ordering is
    /// store-return order.
    pub timestamp: Time,
    pub parent_id: Option<CommentId>,

    /// Replies in store-return order. Only ever populated on top-level
    /// comments; threading is one level deep.
    #[serde(default)]
    pub replies: Vec<Comment>,

    pub like_count: u64,
    pub dislike_count: u64,

    /// The requesting user's own reaction, `None` for anonymous callers.
    pub user_reaction: Option<ReactionType>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub project: ProjectId,
    pub content: String,
    #[serde(default)]
    pub parent: Option<CommentId>,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.content)?;
        if self.content.trim().is_empty() {
            return Err(Error::EmptyComment);
        }
        Ok(())
    }
}

/// Threads a flat, store-ordered comment list into the caller-facing
/// forest.
///
/// Top-level comments come out as roots in input order. A reply is
/// appended to its parent's `replies` when that parent is a root already
/// seen; otherwise it is silently dropped. This drops orphans (parent
/// deleted after the reply was posted), replies appearing before their
/// parent, and replies to replies: the forest is a fixed two-tier
/// structure.
pub fn build_forest(comments: Vec<Comment>) -> Vec<Comment> {
    let mut roots: Vec<Comment> = Vec::new();
    let mut root_idx: HashMap<CommentId, usize> = HashMap::new();
    for c in comments {
        match c.parent_id {
            None => {
                root_idx.insert(c.id, roots.len());
                roots.push(c);
            }
            Some(parent) => {
                if let Some(&i) = root_idx.get(&parent) {
                    roots[i].replies.push(c);
                }
            }
        }
    }
    roots
}
