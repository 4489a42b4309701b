#![cfg(test)]

use std::sync::Arc;

use atelier_api::{
    Comment, CommentId, Error as ApiError, ProjectId, ReactionType, SessionToken, Uuid,
};
use atelier_mock_store::MockStore;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use crate::{app, AppState, ToggleLocks};

fn test_app(store: &Arc<MockStore>) -> Router {
    app(AppState {
        store: store.clone(),
        locks: ToggleLocks::new(),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<SessionToken>,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", token.0));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&body).expect("serializing request body"),
            ))
            .expect("building request"),
        None => req.body(Body::empty()).expect("building request"),
    };
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("sending request to router");
    let status = resp.status();
    let body = hyper::body::to_bytes(resp.into_body())
        .await
        .expect("reading response body")
        .to_vec();
    (status, body)
}

async fn fetch_feed(
    app: &Router,
    project: ProjectId,
    token: Option<SessionToken>,
    order: Option<&str>,
) -> Vec<Comment> {
    let uri = match order {
        None => format!("/api/project-feed/{}", project.0),
        Some(order) => format!("/api/project-feed/{}?order={}", project.0, order),
    };
    let (status, body) = send(app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).expect("parsing feed response")
}

fn api_error(body: &[u8]) -> ApiError {
    ApiError::parse(body).expect("parsing error payload")
}

#[tokio::test]
async fn anonymous_feed_is_threaded_and_aggregated() {
    let store = Arc::new(MockStore::new());
    let (alice, alice_tok) = store.test_add_user("alice");
    let (bob, bob_tok) = store.test_add_user("bob");
    let project = ProjectId(Uuid::new_v4());

    let root = store.test_add_comment(project, Some(alice), "root", None);
    let reply = store.test_add_comment(project, Some(bob), "reply", Some(root));
    // reply to a parent that does not exist in this project
    store.test_add_comment(project, Some(bob), "orphan", Some(CommentId(Uuid::new_v4())));

    let app = test_app(&store);
    for (token, kind) in [(alice_tok, "like"), (bob_tok, "dislike")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/toggle-reaction",
            Some(token),
            Some(serde_json::json!({ "comment": root, "type": kind })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let feed = fetch_feed(&app, project, None, None).await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, root);
    assert_eq!(feed[0].author, "alice");
    assert_eq!((feed[0].like_count, feed[0].dislike_count), (1, 1));
    // anonymous caller never sees a user reaction
    assert_eq!(feed[0].user_reaction, None);
    assert_eq!(feed[0].replies.len(), 1);
    assert_eq!(feed[0].replies[0].id, reply);
    assert_eq!(feed[0].replies[0].user_reaction, None);
}

#[tokio::test]
async fn authenticated_feed_shows_own_reaction() {
    let store = Arc::new(MockStore::new());
    let (alice, alice_tok) = store.test_add_user("alice");
    let project = ProjectId(Uuid::new_v4());
    let root = store.test_add_comment(project, Some(alice), "root", None);

    let app = test_app(&store);
    let (status, _) = send(
        &app,
        "POST",
        "/api/toggle-reaction",
        Some(alice_tok),
        Some(serde_json::json!({ "comment": root, "type": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let feed = fetch_feed(&app, project, Some(alice_tok), None).await;
    assert_eq!(feed[0].user_reaction, Some(ReactionType::Like));
}

#[tokio::test]
async fn toggle_twice_returns_to_no_reaction() {
    let store = Arc::new(MockStore::new());
    let (alice, alice_tok) = store.test_add_user("alice");
    let project = ProjectId(Uuid::new_v4());
    let root = store.test_add_comment(project, Some(alice), "root", None);

    let app = test_app(&store);
    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/toggle-reaction",
            Some(alice_tok),
            Some(serde_json::json!({ "comment": root, "type": "like" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(store.test_reaction_rows(root), Vec::new());
    let feed = fetch_feed(&app, project, Some(alice_tok), None).await;
    assert_eq!(feed[0].user_reaction, None);
    assert_eq!(feed[0].like_count, 0);
}

#[tokio::test]
async fn feed_order_recent_sorts_roots_only() {
    let store = Arc::new(MockStore::new());
    let (alice, _) = store.test_add_user("alice");
    let project = ProjectId(Uuid::new_v4());
    let older = store.test_add_comment(project, Some(alice), "older", None);
    let first_reply = store.test_add_comment(project, Some(alice), "first reply", Some(older));
    let second_reply = store.test_add_comment(project, Some(alice), "second reply", Some(older));
    let newer = store.test_add_comment(project, Some(alice), "newer", None);

    let app = test_app(&store);
    let feed = fetch_feed(&app, project, None, Some("recent")).await;
    assert_eq!(
        feed.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![newer, older],
    );
    // replies keep store order even when roots are re-sorted
    assert_eq!(
        feed[1].replies.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![first_reply, second_reply],
    );
}

#[tokio::test]
async fn toggle_without_credentials_is_rejected_before_io() {
    let store = Arc::new(MockStore::new());
    let app = test_app(&store);
    let (status, body) = send(
        &app,
        "POST",
        "/api/toggle-reaction",
        None,
        Some(serde_json::json!({ "comment": Uuid::new_v4(), "type": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(api_error(&body), ApiError::PermissionDenied);
}

#[tokio::test]
async fn unresolved_session_is_unknown_user_for_writes() {
    let store = Arc::new(MockStore::new());
    store.test_add_user("alice");
    let app = test_app(&store);
    let (status, body) = send(
        &app,
        "POST",
        "/api/toggle-reaction",
        Some(SessionToken(Uuid::new_v4())),
        Some(serde_json::json!({ "comment": Uuid::new_v4(), "type": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(api_error(&body), ApiError::UnknownUser);
}

#[tokio::test]
async fn unresolved_session_reads_as_anonymous() {
    let store = Arc::new(MockStore::new());
    let (alice, alice_tok) = store.test_add_user("alice");
    let project = ProjectId(Uuid::new_v4());
    let root = store.test_add_comment(project, Some(alice), "root", None);

    let app = test_app(&store);
    let (status, _) = send(
        &app,
        "POST",
        "/api/toggle-reaction",
        Some(alice_tok),
        Some(serde_json::json!({ "comment": root, "type": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let feed = fetch_feed(&app, project, Some(SessionToken(Uuid::new_v4())), None).await;
    assert_eq!(feed[0].like_count, 1);
    assert_eq!(feed[0].user_reaction, None);
}

#[tokio::test]
async fn submit_comment_round_trips_through_the_feed() {
    let store = Arc::new(MockStore::new());
    let (_, alice_tok) = store.test_add_user("alice");
    let project = ProjectId(Uuid::new_v4());

    let app = test_app(&store);
    let (status, body) = send(
        &app,
        "POST",
        "/api/submit-comment",
        Some(alice_tok),
        Some(serde_json::json!({ "project": project, "content": "hello there" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created: Comment = serde_json::from_slice(&body).expect("parsing created comment");
    assert_eq!(created.author, "alice");
    assert_eq!(created.parent_id, None);

    let feed = fetch_feed(&app, project, None, None).await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, created.id);
    assert_eq!(feed[0].content, "hello there");
}

#[tokio::test]
async fn submit_comment_rejects_empty_content() {
    let store = Arc::new(MockStore::new());
    let (_, alice_tok) = store.test_add_user("alice");
    let project = ProjectId(Uuid::new_v4());

    let app = test_app(&store);
    let (status, body) = send(
        &app,
        "POST",
        "/api/submit-comment",
        Some(alice_tok),
        Some(serde_json::json!({ "project": project, "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(api_error(&body), ApiError::EmptyComment);
}

#[tokio::test]
async fn store_failure_is_a_bad_gateway() {
    let store = Arc::new(MockStore::failing());
    let app = test_app(&store);
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/project-feed/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(api_error(&body), ApiError::StoreUnavailable);
}
