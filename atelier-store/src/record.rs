use atelier_api::{
    Comment, CommentId, ProjectId, Reaction, ReactionId, ReactionType, Time, UserId, Uuid,
};

/// Author shown when the store has no user attached to a comment row.
pub const ANONYMOUS: &str = "Anonymous";

/// Response envelope of the store: every call comes back as `{ "data": ... }`.
#[derive(Debug, serde::Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// A relation field as the store returns it: bare id, or nested object
/// when the query asked for the relation to be expanded. Normalized once,
/// here, at the fetch boundary; nothing past this module sees both shapes.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum RelationRef {
    Id(Uuid),
    Object(RelatedObject),
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct RelatedObject {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

impl RelationRef {
    pub fn id(&self) -> Uuid {
        match self {
            RelationRef::Id(id) => *id,
            RelationRef::Object(o) => o.id,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            RelationRef::Id(_) => None,
            RelationRef::Object(o) => o.name.as_deref(),
        }
    }
}

/// One row of the `comments` collection, before normalization.
#[derive(Debug, serde::Deserialize)]
pub struct CommentRecord {
    pub id: Uuid,
    pub project: RelationRef,
    #[serde(default)]
    pub user: Option<RelationRef>,
    pub content: String,
    pub date_created: Time,
    #[serde(default)]
    pub parent: Option<RelationRef>,
}

impl CommentRecord {
    pub fn into_comment(self) -> Comment {
        Comment {
            id: CommentId(self.id),
            project_id: ProjectId(self.project.id()),
            author: self
                .user
                .as_ref()
                .and_then(|u| u.display_name())
                .unwrap_or(ANONYMOUS)
                .to_string(),
            content: self.content,
            timestamp: self.date_created,
            parent_id: self.parent.map(|p| CommentId(p.id())),
            replies: Vec::new(),
            like_count: 0,
            dislike_count: 0,
            user_reaction: None,
        }
    }
}

/// One row of the `reactions` collection.
#[derive(Debug, serde::Deserialize)]
pub struct ReactionRecord {
    pub id: Uuid,
    pub comment: RelationRef,
    pub user: RelationRef,
    #[serde(rename = "type")]
    pub kind: ReactionType,
}

impl ReactionRecord {
    pub fn into_reaction(self) -> Reaction {
        Reaction {
            id: ReactionId(self.id),
            comment_id: CommentId(self.comment.id()),
            user_id: UserId(self.user.id()),
            kind: self.kind,
        }
    }
}

/// One row of the `users` collection; only the id matters for resolution.
#[derive(Debug, serde::Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
}
