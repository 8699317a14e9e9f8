//! Catalog listing API integration tests.
//!
//! Run with: `cargo test -p vidshelf-api --test videos_test`

mod helpers;

use helpers::{api_path, setup_test_app};
use serde_json::Value;
use uuid::Uuid;
use vidshelf_core::BackendState;

#[tokio::test]
async fn test_list_without_pagination_returns_array() {
    let app = setup_test_app().await;
    app.seed(3).await;

    let response = app.client().get(&api_path("/videos")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let videos = body.as_array().unwrap();
    assert_eq!(videos.len(), 3);
    assert_eq!(videos[0]["title"], "Seeded 2");
    assert_eq!(videos[2]["title"], "Seeded 0");
    // storage ids stay internal
    assert!(videos[0].get("mediaStorageId").is_none());
}

#[tokio::test]
async fn test_paginated_listing_over_25_records() {
    let app = setup_test_app().await;
    app.seed(25).await;

    let first: Value = app
        .client()
        .get(&api_path("/videos"))
        .add_query_param("page", 1)
        .add_query_param("limit", 12)
        .await
        .json();
    assert_eq!(first["videos"].as_array().unwrap().len(), 12);
    assert_eq!(first["hasMore"], true);
    assert_eq!(first["page"], 1);
    assert_eq!(first["total"], 25);
    assert_eq!(first["videos"][0]["title"], "Seeded 24");

    let second: Value = app
        .client()
        .get(&api_path("/videos?page=2&limit=12"))
        .await
        .json();
    assert_eq!(second["videos"].as_array().unwrap().len(), 12);
    assert_eq!(second["hasMore"], true);
    assert_eq!(second["videos"][0]["title"], "Seeded 12");

    let third: Value = app
        .client()
        .get(&api_path("/videos?page=3&limit=12"))
        .await
        .json();
    assert_eq!(third["videos"].as_array().unwrap().len(), 1);
    assert_eq!(third["hasMore"], false);
    assert_eq!(third["videos"][0]["title"], "Seeded 0");

    let beyond: Value = app
        .client()
        .get(&api_path("/videos?page=9&limit=12"))
        .await
        .json();
    assert!(beyond["videos"].as_array().unwrap().is_empty());
    assert_eq!(beyond["hasMore"], false);
}

#[tokio::test]
async fn test_limit_alone_uses_first_page_and_clamps() {
    let app = setup_test_app().await;
    app.seed(5).await;

    let body: Value = app
        .client()
        .get(&api_path("/videos?limit=500"))
        .await
        .json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["videos"].as_array().unwrap().len(), 5);
    assert_eq!(body["hasMore"], false);
}

#[tokio::test]
async fn test_malformed_pagination_is_bad_request() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/videos?page=abc")).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_listing_degrades_to_empty_when_catalog_down() {
    let app = setup_test_app().await;
    app.seed(4).await;
    app.set_catalog_state(BackendState::Error);

    let bare = app.client().get(&api_path("/videos")).await;
    assert_eq!(bare.status_code(), 200);
    assert_eq!(bare.json::<Value>(), serde_json::json!([]));

    let paged: Value = app
        .client()
        .get(&api_path("/videos?page=1"))
        .await
        .json();
    assert!(paged["videos"].as_array().unwrap().is_empty());
    assert_eq!(paged["hasMore"], false);
}

#[tokio::test]
async fn test_get_video_by_id() {
    let app = setup_test_app().await;
    let records = app.seed(2).await;

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", records[1].id)))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["id"], records[1].id.to_string());
    assert_eq!(body["title"], "Seeded 1");
    assert_eq!(body["mediaUrl"], records[1].media_url);
}

#[tokio::test]
async fn test_get_video_errors() {
    let app = setup_test_app().await;
    app.seed(1).await;

    let malformed = app.client().get(&api_path("/videos/not-an-id")).await;
    assert_eq!(malformed.status_code(), 400);
    assert_eq!(malformed.json::<Value>()["code"], "INVALID_IDENTIFIER");

    let unknown = app
        .client()
        .get(&api_path(&format!("/videos/{}", Uuid::new_v4())))
        .await;
    assert_eq!(unknown.status_code(), 404);

    app.set_catalog_state(BackendState::Disconnected);
    let unavailable = app
        .client()
        .get(&api_path(&format!("/videos/{}", Uuid::new_v4())))
        .await;
    assert_eq!(unavailable.status_code(), 503);
}
