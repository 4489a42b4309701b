use anyhow::Context;

use crate::{aggregate, build_forest, Comment, CommentId, ProjectId, ReactionType, Store, UserId};

/// Runs the whole read pipeline for one project: fetch the comments and
/// reaction rows, annotate each comment with its summary, then thread the
/// list into the forest.
///
/// Roots come back in store-return order; any caller-facing ordering is
/// applied by the caller afterwards. Any underlying fetch failure aborts
/// the whole read, there is no partial result.
pub async fn project_feed<S: Store + ?Sized>(
    store: &S,
    project: ProjectId,
    caller: Option<UserId>,
) -> anyhow::Result<Vec<Comment>> {
    let comments = store
        .comments_for_project(project)
        .await
        .with_context(|| format!("fetching comments for project {:?}", project))?;
    if comments.is_empty() {
        return Ok(Vec::new());
    }

    let ids = comments.iter().map(|c| c.id).collect::<Vec<_>>();
    let reactions = store
        .reactions_for_comments(&ids)
        .await
        .with_context(|| format!("fetching reactions for project {:?}", project))?;
    let mine = match caller {
        None => Vec::new(),
        Some(user) => store
            .reactions_of_user(&ids, user)
            .await
            .with_context(|| format!("fetching own reactions of user {:?}", user))?,
    };

    Ok(build_forest(aggregate(comments, &reactions, &mine)))
}

/// Tri-state reaction toggle: create when absent, delete when the same
/// kind is requested again, flip the row in place otherwise.
///
/// The lookup-then-write sequence is not transactional against the store;
/// callers needing same-pair serialization hold a lock around this call.
pub async fn toggle_reaction<S: Store + ?Sized>(
    store: &S,
    comment: CommentId,
    caller: UserId,
    requested: ReactionType,
) -> anyhow::Result<()> {
    let existing = store
        .reaction_for(comment, caller)
        .await
        .with_context(|| format!("looking up reaction of {:?} on {:?}", caller, comment))?;
    match existing {
        None => store
            .create_reaction(comment, caller, requested)
            .await
            .with_context(|| format!("creating reaction on {:?}", comment)),
        Some(r) if r.kind == requested => store
            .delete_reaction(r.id)
            .await
            .with_context(|| format!("deleting reaction {:?}", r.id)),
        Some(r) => store
            .update_reaction(r.id, requested)
            .await
            .with_context(|| format!("switching reaction {:?}", r.id)),
    }
}
