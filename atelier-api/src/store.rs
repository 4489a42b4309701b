use async_trait::async_trait;

use crate::{
    Comment, CommentId, NewComment, ProjectId, Reaction, ReactionId, ReactionType, SessionToken,
    UserId,
};

/// Data-access interface over the external store.
///
/// Implemented over HTTP by `atelier-store` and in memory by
/// `atelier-mock-store`. The pipeline in [`crate::project_feed`] and
/// [`crate::toggle_reaction`] only ever goes through this trait, so both
/// implementations run the exact same read and toggle logic.
#[async_trait]
pub trait Store {
    /// All comments of a project, in store-return order.
    async fn comments_for_project(&self, project: ProjectId) -> anyhow::Result<Vec<Comment>>;

    /// All reaction rows whose comment is in `comments`.
    async fn reactions_for_comments(
        &self,
        comments: &[CommentId],
    ) -> anyhow::Result<Vec<Reaction>>;

    /// The subset of reaction rows on `comments` belonging to `user`.
    async fn reactions_of_user(
        &self,
        comments: &[CommentId],
        user: UserId,
    ) -> anyhow::Result<Vec<Reaction>>;

    /// The unique reaction row for (comment, user), if any.
    async fn reaction_for(
        &self,
        comment: CommentId,
        user: UserId,
    ) -> anyhow::Result<Option<Reaction>>;

    async fn create_reaction(
        &self,
        comment: CommentId,
        user: UserId,
        kind: ReactionType,
    ) -> anyhow::Result<()>;

    async fn update_reaction(&self, reaction: ReactionId, kind: ReactionType)
        -> anyhow::Result<()>;

    async fn delete_reaction(&self, reaction: ReactionId) -> anyhow::Result<()>;

    async fn create_comment(&self, author: UserId, comment: &NewComment)
        -> anyhow::Result<Comment>;

    /// Maps an external-auth session to the store's own user reference.
    /// `None` means the session resolves to nobody the store knows about.
    async fn resolve_session(&self, token: SessionToken) -> anyhow::Result<Option<UserId>>;
}
