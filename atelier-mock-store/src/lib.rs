use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use atelier_api::{
    Comment, CommentId, NewComment, ProjectId, Reaction, ReactionId, ReactionType, SessionToken,
    Store, Time, UserId, Uuid,
};
use chrono::TimeZone;

/// In-memory stand-in for the external store, for tests.
///
/// Rows are kept the way the store keeps them (author as a user
/// reference, reactions as raw rows); display names are resolved at fetch
/// time with the same "Anonymous" fallback as the HTTP client, so the
/// pipeline sees the exact same shapes either way.
pub struct MockStore {
    fail: bool,
    data: Mutex<Collections>,
}

#[derive(Default)]
struct Collections {
    users: Vec<UserRow>,
    comments: Vec<CommentRow>,
    reactions: Vec<Reaction>,
    // monotonic creation counter; doubles as the timestamp source so
    // store-return order and recency agree like they do in the real store
    seq: i64,
}

struct UserRow {
    id: UserId,
    name: String,
    subject: SessionToken,
}

#[derive(Clone)]
struct CommentRow {
    id: CommentId,
    project: ProjectId,
    user: Option<UserId>,
    content: String,
    date_created: Time,
    parent: Option<CommentId>,
}

impl Collections {
    fn next_timestamp(&mut self) -> Time {
        self.seq += 1;
        chrono::Utc
            .timestamp_opt(1_700_000_000 + self.seq, 0)
            .unwrap()
    }

    fn author_name(&self, user: Option<UserId>) -> String {
        user.and_then(|id| self.users.iter().find(|u| u.id == id))
            .map(|u| u.name.clone())
            .unwrap_or_else(|| String::from("Anonymous"))
    }

    fn to_comment(&self, row: &CommentRow) -> Comment {
        Comment {
            id: row.id,
            project_id: row.project,
            author: self.author_name(row.user),
            content: row.content.clone(),
            timestamp: row.date_created,
            parent_id: row.parent,
            replies: Vec::new(),
            like_count: 0,
            dislike_count: 0,
            user_reaction: None,
        }
    }
}

impl MockStore {
    pub fn new() -> MockStore {
        MockStore {
            fail: false,
            data: Mutex::new(Collections::default()),
        }
    }

    /// A store where every call fails, for exercising the
    /// upstream-unavailable path.
    pub fn failing() -> MockStore {
        MockStore {
            fail: true,
            data: Mutex::new(Collections::default()),
        }
    }

    fn collections(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Collections>> {
        if self.fail {
            return Err(anyhow!("mock store is down"));
        }
        Ok(self.data.lock().expect("mock store mutex poisoned"))
    }

    /// Seed a user; returns its store reference and a session token that
    /// resolves to it.
    pub fn test_add_user(&self, name: &str) -> (UserId, SessionToken) {
        let mut data = self.data.lock().expect("mock store mutex poisoned");
        let id = UserId(Uuid::new_v4());
        let subject = SessionToken(Uuid::new_v4());
        data.users.push(UserRow {
            id,
            name: name.to_string(),
            subject,
        });
        (id, subject)
    }

    /// Seed a comment row directly, bypassing the caller-facing endpoint.
    pub fn test_add_comment(
        &self,
        project: ProjectId,
        author: Option<UserId>,
        content: &str,
        parent: Option<CommentId>,
    ) -> CommentId {
        let mut data = self.data.lock().expect("mock store mutex poisoned");
        let id = CommentId(Uuid::new_v4());
        let date_created = data.next_timestamp();
        data.comments.push(CommentRow {
            id,
            project,
            user: author,
            content: content.to_string(),
            date_created,
            parent,
        });
        id
    }

    /// Raw reaction rows currently stored for one comment.
    pub fn test_reaction_rows(&self, comment: CommentId) -> Vec<Reaction> {
        let data = self.data.lock().expect("mock store mutex poisoned");
        data.reactions
            .iter()
            .filter(|r| r.comment_id == comment)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Store for MockStore {
    async fn comments_for_project(&self, project: ProjectId) -> anyhow::Result<Vec<Comment>> {
        let data = self.collections()?;
        Ok(data
            .comments
            .iter()
            .filter(|c| c.project == project)
            .map(|c| data.to_comment(c))
            .collect())
    }

    async fn reactions_for_comments(
        &self,
        comments: &[CommentId],
    ) -> anyhow::Result<Vec<Reaction>> {
        let data = self.collections()?;
        Ok(data
            .reactions
            .iter()
            .filter(|r| comments.contains(&r.comment_id))
            .cloned()
            .collect())
    }

    async fn reactions_of_user(
        &self,
        comments: &[CommentId],
        user: UserId,
    ) -> anyhow::Result<Vec<Reaction>> {
        let data = self.collections()?;
        Ok(data
            .reactions
            .iter()
            .filter(|r| r.user_id == user && comments.contains(&r.comment_id))
            .cloned()
            .collect())
    }

    async fn reaction_for(
        &self,
        comment: CommentId,
        user: UserId,
    ) -> anyhow::Result<Option<Reaction>> {
        let data = self.collections()?;
        Ok(data
            .reactions
            .iter()
            .find(|r| r.comment_id == comment && r.user_id == user)
            .cloned())
    }

    async fn create_reaction(
        &self,
        comment: CommentId,
        user: UserId,
        kind: ReactionType,
    ) -> anyhow::Result<()> {
        let mut data = self.collections()?;
        data.reactions.push(Reaction {
            id: ReactionId(Uuid::new_v4()),
            comment_id: comment,
            user_id: user,
            kind,
        });
        Ok(())
    }

    async fn update_reaction(
        &self,
        reaction: ReactionId,
        kind: ReactionType,
    ) -> anyhow::Result<()> {
        let mut data = self.collections()?;
        let row = data
            .reactions
            .iter_mut()
            .find(|r| r.id == reaction)
            .ok_or_else(|| anyhow!("updating reaction {:?} that is not in the store", reaction))?;
        row.kind = kind;
        Ok(())
    }

    async fn delete_reaction(&self, reaction: ReactionId) -> anyhow::Result<()> {
        let mut data = self.collections()?;
        let before = data.reactions.len();
        data.reactions.retain(|r| r.id != reaction);
        if data.reactions.len() == before {
            return Err(anyhow!(
                "deleting reaction {:?} that is not in the store",
                reaction
            ));
        }
        Ok(())
    }

    async fn create_comment(
        &self,
        author: UserId,
        comment: &NewComment,
    ) -> anyhow::Result<Comment> {
        let mut data = self.collections()?;
        let id = CommentId(Uuid::new_v4());
        let date_created = data.next_timestamp();
        let row = CommentRow {
            id,
            project: comment.project,
            user: Some(author),
            content: comment.content.clone(),
            date_created,
            parent: comment.parent,
        };
        data.comments.push(row.clone());
        Ok(data.to_comment(&row))
    }

    async fn resolve_session(&self, token: SessionToken) -> anyhow::Result<Option<UserId>> {
        let data = self.collections()?;
        Ok(data
            .users
            .iter()
            .find(|u| u.subject == token)
            .map(|u| u.id))
    }
}
