//! HTTP-level integration tests for favorites and the user profile.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, delete_as, get, get_as, login_as, post_as, post_json_as, send_form,
    MultipartForm, TestApp,
};
use sqlx::PgPool;

async fn create_fiction(app: &TestApp, cookie: &str, title: &str) -> i64 {
    let form = MultipartForm::new()
        .text("title", title)
        .text("status", "Hiatus");
    let response = send_form(app.app(), Method::POST, "/api/f/c", Some(cookie), form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Add is 201 the first time and 409 the second; status follows.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_favorite_twice(pool: PgPool) {
    let (_author, author_cookie) = login_as(&pool, "alice").await;
    let (_reader, reader_cookie) = login_as(&pool, "bob").await;
    let app = common::build_test_app(pool);
    let id = create_fiction(&app, &author_cookie, "Beloved").await;

    let status = body_json(get_as(app.app(), &format!("/api/f/{id}/fav/status"), &reader_cookie).await).await;
    assert_eq!(status["is_favorited"], false);

    let response = post_as(app.app(), &format!("/api/f/{id}/fav"), &reader_cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["is_favorited"], true);

    let response = post_as(app.app(), &format!("/api/f/{id}/fav"), &reader_cookie).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let status = body_json(get_as(app.app(), &format!("/api/f/{id}/fav/status"), &reader_cookie).await).await;
    assert_eq!(status["is_favorited"], true);
}

/// Remove is 200 once, then 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_favorite(pool: PgPool) {
    let (_user, cookie) = login_as(&pool, "alice").await;
    let app = common::build_test_app(pool);
    let id = create_fiction(&app, &cookie, "Fleeting").await;
    post_as(app.app(), &format!("/api/f/{id}/fav"), &cookie).await;

    let response = delete_as(app.app(), &format!("/api/f/{id}/fav/rmv"), &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_favorited"], false);

    let response = delete_as(app.app(), &format!("/api/f/{id}/fav/rmv"), &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Fiction not found in your favorites"
    );
}

/// Favoriting a fiction that does not exist is a 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favorite_missing_fiction(pool: PgPool) {
    let (_user, cookie) = login_as(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = post_as(app.app(), "/api/f/777777/fav", &cookie).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Favorites are per user and need a session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favorites_require_session(pool: PgPool) {
    let (_user, cookie) = login_as(&pool, "alice").await;
    let app = common::build_test_app(pool);
    let id = create_fiction(&app, &cookie, "Private").await;

    let response = get(app.app(), &format!("/api/f/{id}/fav/status")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_as(
        app.app(),
        &format!("/api/f/{id}/fav"),
        None,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The profile lists favorited and contributed fictions with chapters.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_profile(pool: PgPool) {
    let (author, author_cookie) = login_as(&pool, "alice").await;
    let (_reader, reader_cookie) = login_as(&pool, "bob").await;
    let app = common::build_test_app(pool);
    let id = create_fiction(&app, &author_cookie, "Shared").await;
    post_json_as(
        app.app(),
        &format!("/api/f/{id}/c"),
        Some(&author_cookie),
        serde_json::json!({ "title": "Part one" }),
    )
    .await;
    post_as(app.app(), &format!("/api/f/{id}/fav"), &reader_cookie).await;

    let response = get_as(app.app(), "/api/user", &author_cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], author.id);
    assert_eq!(json["name"], "alice");
    assert_eq!(json["super_user"], false);
    assert_eq!(json["fav_fictions"].as_array().unwrap().len(), 0);
    let contributed = json["contributed_fictions"].as_array().unwrap();
    assert_eq!(contributed.len(), 1);
    assert_eq!(contributed[0]["title"], "Shared");
    assert_eq!(contributed[0]["chapters"][0]["title"], "Part one");

    let json = body_json(get_as(app.app(), "/api/user", &reader_cookie).await).await;
    assert_eq!(json["contributed_fictions"].as_array().unwrap().len(), 0);
    let favs = json["fav_fictions"].as_array().unwrap();
    assert_eq!(favs.len(), 1);
    assert_eq!(favs[0]["id"], id);
}

/// The profile requires a valid session cookie.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_profile_requires_session(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.app(), "/api/user").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Unauthorized. Please log in first"
    );

    let response = get_as(app.app(), "/api/user", "fictsu-session=not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired session");
}
