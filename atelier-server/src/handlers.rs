use atelier_api::{Comment, FeedOrder, NewComment, ProjectId, ToggleReaction};
use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{extractors::*, Error, ToggleLocks};

#[derive(serde::Deserialize)]
pub struct FeedParams {
    #[serde(default)]
    pub order: Option<FeedOrder>,
}

pub async fn project_feed(
    MaybeAuth(user): MaybeAuth,
    State(store): State<DynStore>,
    Path(project): Path<ProjectId>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<Comment>>, Error> {
    let mut feed = atelier_api::project_feed(&*store, project, user)
        .await
        .map_err(Error::Store)?;
    if let Some(order) = params.order {
        order.sort(&mut feed);
    }
    Ok(Json(feed))
}

pub async fn submit_comment(
    Auth(user): Auth,
    State(store): State<DynStore>,
    Json(data): Json<NewComment>,
) -> Result<Json<Comment>, Error> {
    data.validate()?;
    let created = store
        .create_comment(user, &data)
        .await
        .map_err(Error::Store)?;
    Ok(Json(created))
}

pub async fn toggle_reaction(
    Auth(user): Auth,
    State(store): State<DynStore>,
    State(locks): State<ToggleLocks>,
    Json(data): Json<ToggleReaction>,
) -> Result<(), Error> {
    let _held = locks.hold(data.comment, user).await;
    atelier_api::toggle_reaction(&*store, data.comment, user, data.kind)
        .await
        .map_err(Error::Store)?;
    Ok(())
}
