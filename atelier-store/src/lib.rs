use anyhow::Context;
use async_trait::async_trait;
use atelier_api::{
    Comment, CommentId, NewComment, ProjectId, Reaction, ReactionId, ReactionType, SessionToken,
    Store, UserId,
};
use reqwest::Method;
use serde_json::json;

mod record;

use record::{CommentRecord, Envelope, ReactionRecord, UserRecord};

// Ask for the author relation expanded so display names come back in the
// same round-trip; everything else stays a bare id.
const COMMENT_FIELDS: &str = "*,user.id,user.name";

/// HTTP client for the external headless store.
///
/// Reads go through `GET /items/<collection>` with `filter[...]`
/// parameters and come back wrapped in `{ "data": [...] }`; writes are
/// plain POST/PATCH/DELETE on the `reactions` and `comments` collections.
/// No retries anywhere: a failed call fails the whole operation.
pub struct HttpStore {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl HttpStore {
    /// `token`, when present, is the store-side service token, sent as a
    /// bearer header on every call.
    pub fn new(base: &str, token: Option<String>) -> HttpStore {
        HttpStore {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let req = self.client.request(method, format!("{}{}", self.base, path));
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn fetch<T>(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        Ok(self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .context("sending request to store")?
            .error_for_status()
            .context("store answered with an error status")?
            .json::<Envelope<T>>()
            .await
            .context("decoding store response")?
            .data)
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> anyhow::Result<()> {
        let req = self.request(method, path);
        let req = match body {
            Some(body) => req.json(&body),
            None => req,
        };
        req.send()
            .await
            .context("sending request to store")?
            .error_for_status()
            .context("store answered with an error status")?;
        Ok(())
    }
}

fn id_list(ids: &[CommentId]) -> String {
    ids.iter()
        .map(|c| c.0.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl Store for HttpStore {
    async fn comments_for_project(&self, project: ProjectId) -> anyhow::Result<Vec<Comment>> {
        let records: Vec<CommentRecord> = self
            .fetch(
                "/items/comments",
                &[
                    ("filter[project][_eq]", project.0.to_string()),
                    ("fields", COMMENT_FIELDS.to_string()),
                ],
            )
            .await
            .with_context(|| format!("listing comments of project {:?}", project))?;
        Ok(records
            .into_iter()
            .map(CommentRecord::into_comment)
            .collect())
    }

    async fn reactions_for_comments(
        &self,
        comments: &[CommentId],
    ) -> anyhow::Result<Vec<Reaction>> {
        // the store rejects an empty _in list
        if comments.is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<ReactionRecord> = self
            .fetch(
                "/items/reactions",
                &[("filter[comment][_in]", id_list(comments))],
            )
            .await
            .context("listing reactions")?;
        Ok(records
            .into_iter()
            .map(ReactionRecord::into_reaction)
            .collect())
    }

    async fn reactions_of_user(
        &self,
        comments: &[CommentId],
        user: UserId,
    ) -> anyhow::Result<Vec<Reaction>> {
        if comments.is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<ReactionRecord> = self
            .fetch(
                "/items/reactions",
                &[
                    ("filter[comment][_in]", id_list(comments)),
                    ("filter[user][_eq]", user.0.to_string()),
                ],
            )
            .await
            .with_context(|| format!("listing reactions of user {:?}", user))?;
        Ok(records
            .into_iter()
            .map(ReactionRecord::into_reaction)
            .collect())
    }

    async fn reaction_for(
        &self,
        comment: CommentId,
        user: UserId,
    ) -> anyhow::Result<Option<Reaction>> {
        let records: Vec<ReactionRecord> = self
            .fetch(
                "/items/reactions",
                &[
                    ("filter[comment][_eq]", comment.0.to_string()),
                    ("filter[user][_eq]", user.0.to_string()),
                ],
            )
            .await
            .with_context(|| format!("looking up reaction of {:?} on {:?}", user, comment))?;
        // at most one row per (comment, user); if a past race left more,
        // the first one is the row the toggle will act on
        Ok(records
            .into_iter()
            .next()
            .map(ReactionRecord::into_reaction))
    }

    async fn create_reaction(
        &self,
        comment: CommentId,
        user: UserId,
        kind: ReactionType,
    ) -> anyhow::Result<()> {
        self.write(
            Method::POST,
            "/items/reactions",
            Some(json!({
                "comment": comment,
                "user": user,
                "type": kind,
            })),
        )
        .await
        .with_context(|| format!("creating reaction on {:?}", comment))
    }

    async fn update_reaction(
        &self,
        reaction: ReactionId,
        kind: ReactionType,
    ) -> anyhow::Result<()> {
        self.write(
            Method::PATCH,
            &format!("/items/reactions/{}", reaction.0),
            Some(json!({ "type": kind })),
        )
        .await
        .with_context(|| format!("updating reaction {:?}", reaction))
    }

    async fn delete_reaction(&self, reaction: ReactionId) -> anyhow::Result<()> {
        self.write(
            Method::DELETE,
            &format!("/items/reactions/{}", reaction.0),
            None,
        )
        .await
        .with_context(|| format!("deleting reaction {:?}", reaction))
    }

    async fn create_comment(
        &self,
        author: UserId,
        comment: &NewComment,
    ) -> anyhow::Result<Comment> {
        let record: Envelope<CommentRecord> = self
            .request(Method::POST, "/items/comments")
            .query(&[("fields", COMMENT_FIELDS)])
            .json(&json!({
                "project": comment.project,
                "user": author,
                "content": comment.content,
                "parent": comment.parent,
            }))
            .send()
            .await
            .context("sending request to store")?
            .error_for_status()
            .context("store answered with an error status")?
            .json()
            .await
            .context("decoding created comment")?;
        Ok(record.data.into_comment())
    }

    async fn resolve_session(&self, token: SessionToken) -> anyhow::Result<Option<UserId>> {
        let records: Vec<UserRecord> = self
            .fetch(
                "/items/users",
                &[
                    ("filter[subject][_eq]", token.0.to_string()),
                    ("fields", "id".to_string()),
                ],
            )
            .await
            .context("resolving session against the user collection")?;
        Ok(records.into_iter().next().map(|u| UserId(u.id)))
    }
}
