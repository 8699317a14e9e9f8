//! Interaction API integration tests.
//!
//! Run with: `cargo test -p vidshelf-api --test interactions_test`

mod helpers;

use futures::future::join_all;
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};
use std::future::IntoFuture;
use uuid::Uuid;
use vidshelf_core::BackendState;
use vidshelf_db::CatalogStore;

#[tokio::test]
async fn test_view_like_dislike_increment_counters() {
    let app = setup_test_app().await;
    let record = app.seed(1).await.remove(0);

    for action in ["view", "view", "like", "dislike"] {
        let response = app
            .client()
            .post(&api_path(&format!("/{}/{}", action, record.id)))
            .await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>(), json!({ "success": true }));
    }

    let stored = app.catalog.inner().find(record.id).await.unwrap().unwrap();
    assert_eq!((stored.views, stored.likes, stored.dislikes), (2, 1, 1));
}

#[tokio::test]
async fn test_concurrent_likes_are_not_lost() {
    let app = setup_test_app().await;
    let record = app.seed(1).await.remove(0);
    let path = api_path(&format!("/like/{}", record.id));

    let responses = join_all(
        (0..25).map(|_| app.client().post(&path).into_future()),
    )
    .await;
    assert!(responses.iter().all(|r| r.status_code() == 200));

    let stored = app.catalog.inner().find(record.id).await.unwrap().unwrap();
    assert_eq!(stored.likes, 25);
}

#[tokio::test]
async fn test_malformed_id_is_rejected_without_catalog_access() {
    let app = setup_test_app().await;
    let calls_before = app.catalog.calls();

    for path in ["/view/123", "/like/not-a-uuid", "/dislike/abc"] {
        let response = app.client().post(&api_path(path)).await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<Value>()["code"], "INVALID_IDENTIFIER");
    }
    let response = app
        .client()
        .post(&api_path("/comment/xyz"))
        .json(&json!({ "text": "hi" }))
        .await;
    assert_eq!(response.status_code(), 400);

    assert_eq!(app.catalog.calls(), calls_before);
}

#[tokio::test]
async fn test_unknown_id_answers_success() {
    let app = setup_test_app().await;
    let unknown = Uuid::new_v4();

    let like = app
        .client()
        .post(&api_path(&format!("/like/{}", unknown)))
        .await;
    assert_eq!(like.status_code(), 200);

    let comment = app
        .client()
        .post(&api_path(&format!("/comment/{}", unknown)))
        .json(&json!({ "text": "anyone here?" }))
        .await;
    assert_eq!(comment.status_code(), 200);
    assert!(app.catalog.inner().is_empty().await);
}

#[tokio::test]
async fn test_comments_append_in_order() {
    let app = setup_test_app().await;
    let record = app.seed(1).await.remove(0);
    let path = api_path(&format!("/comment/{}", record.id));

    for text in ["first!", "  second  ", "third"] {
        let response = app.client().post(&path).json(&json!({ "text": text })).await;
        assert_eq!(response.status_code(), 200);
    }

    let body: Value = app
        .client()
        .get(&api_path(&format!("/videos/{}", record.id)))
        .await
        .json();
    assert_eq!(body["comments"], json!(["first!", "second", "third"]));
}

#[tokio::test]
async fn test_comment_validation() {
    let app = setup_test_app().await;
    let record = app.seed(1).await.remove(0);
    let path = api_path(&format!("/comment/{}", record.id));

    let missing = app.client().post(&path).json(&json!({})).await;
    assert_eq!(missing.status_code(), 400);

    let blank = app.client().post(&path).json(&json!({ "text": "   " })).await;
    assert_eq!(blank.status_code(), 400);

    let too_long = app
        .client()
        .post(&path)
        .json(&json!({ "text": "x".repeat(201) }))
        .await;
    assert_eq!(too_long.status_code(), 400);

    let stored = app.catalog.inner().find(record.id).await.unwrap().unwrap();
    assert!(stored.comments.is_empty());
}

#[tokio::test]
async fn test_interactions_unavailable_when_catalog_down() {
    let app = setup_test_app().await;
    let record = app.seed(1).await.remove(0);
    app.set_catalog_state(BackendState::Disconnected);

    let like = app
        .client()
        .post(&api_path(&format!("/like/{}", record.id)))
        .await;
    assert_eq!(like.status_code(), 503);
    assert_eq!(like.json::<Value>()["code"], "BACKEND_UNAVAILABLE");

    app.set_catalog_state(BackendState::Connected);
    let like = app
        .client()
        .post(&api_path(&format!("/like/{}", record.id)))
        .await;
    assert_eq!(like.status_code(), 200);
}
