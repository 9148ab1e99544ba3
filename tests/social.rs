//! Comment and reaction-toggle tests.

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::json;

// ===========================================================================
// Comments
// ===========================================================================

#[tokio::test]
async fn comment_requires_auth() {
    let app = app().await;
    let author = app.create_user("comment_noauth").await;
    let post_id = app.create_post_for_user(author.id).await;

    let resp = app
        .post_json(
            &format!("/api/posts/{}/comments", post_id),
            json!({ "content": "hello" }),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_comment() {
    let app = app().await;
    let author = app.create_user("comment_author").await;
    let commenter = app.create_user("comment_writer").await;
    let post_id = app.create_post_for_user(author.id).await;

    let resp = app
        .post_json(
            &format!("/api/posts/{}/comments", post_id),
            json!({ "content": "well said" }),
            Some(&commenter.token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["content"].as_str().unwrap(), "well said");
    assert_eq!(body["post_id"].as_i64().unwrap(), post_id);
    assert_eq!(body["user_id"].as_i64().unwrap(), commenter.id);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn create_comment_empty_body() {
    let app = app().await;
    let author = app.create_user("comment_empty").await;
    let post_id = app.create_post_for_user(author.id).await;

    let resp = app
        .post_json(
            &format!("/api/posts/{}/comments", post_id),
            json!({ "content": "   " }),
            Some(&author.token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "content cannot be empty");
}

#[tokio::test]
async fn create_comment_too_long() {
    let app = app().await;
    let author = app.create_user("comment_long").await;
    let post_id = app.create_post_for_user(author.id).await;

    let long_body: String = "x".repeat(1001);
    let resp = app
        .post_json(
            &format!("/api/posts/{}/comments", post_id),
            json!({ "content": long_body }),
            Some(&author.token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "content exceeds 1000 characters");
}

// ===========================================================================
// Reactions
// ===========================================================================

#[tokio::test]
async fn toggle_reaction_likes_then_unlikes() {
    let app = app().await;
    let author = app.create_user("reaction_author").await;
    let reactor = app.create_user("reaction_user").await;
    let post_id = app.create_post_for_user(author.id).await;

    let resp = app
        .post_json(
            &format!("/api/posts/{}/reaction", post_id),
            json!({}),
            Some(&reactor.token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"].as_str().unwrap(), "liked");

    let resp = app
        .post_json(
            &format!("/api/posts/{}/reaction", post_id),
            json!({}),
            Some(&reactor.token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"].as_str().unwrap(), "unliked");

    // After a full toggle cycle, no reaction row remains.
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reactions WHERE user_id = $1 AND post_id = $2",
    )
    .bind(reactor.id)
    .bind(post_id)
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn reactions_are_unique_per_user() {
    let app = app().await;
    let author = app.create_user("reaction_unique").await;
    let first = app.create_user("reaction_first").await;
    let second = app.create_user("reaction_second").await;
    let post_id = app.create_post_for_user(author.id).await;

    for user in [&first, &second] {
        let resp = app
            .post_json(
                &format!("/api/posts/{}/reaction", post_id),
                json!({}),
                Some(&user.token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.json()["status"].as_str().unwrap(), "liked");
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reactions WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn reaction_requires_auth() {
    let app = app().await;
    let author = app.create_user("reaction_noauth").await;
    let post_id = app.create_post_for_user(author.id).await;

    let resp = app
        .post_json(&format!("/api/posts/{}/reaction", post_id), json!({}), None)
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}
