//! Integration tests for the user surface: signup, login, logout, profile,
//! search, friends and avatars.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use common::{basic, bearer, get_authed, id_of, signup, signup_body, spawn, token_of};

// ============================================================================
// Signup / login / logout
// ============================================================================

#[tokio::test]
async fn test_signup_returns_public_user_with_token() {
    let app = spawn().await;

    let user = signup(&app, "sheng").await;
    assert_eq!(user["username"], "sheng");
    assert_eq!(user["first_name"], "Sheng");
    assert!(user["token"].is_string());
    assert!(user["asset"].is_null());
    // The digest never leaves the server.
    assert!(user.get("password_digest").is_none());
}

#[tokio::test]
async fn test_signup_without_user_info_is_bad_request() {
    let app = spawn().await;

    let response = app
        .server
        .post("/users/signup")
        .json(&json!({ "os_name": "mac os", "time_zone": "CEST" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_username_is_bad_request() {
    let app = spawn().await;

    signup(&app, "sheng").await;
    let response = app
        .server
        .post("/users/signup")
        .json(&signup_body("sheng"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_same_device_login_reuses_token() {
    let app = spawn().await;
    let user = signup(&app, "sheng").await;

    let response = app
        .server
        .post("/users/login")
        .add_header(AUTHORIZATION, basic("sheng", "12345678"))
        .json(&json!({ "os_name": "mac os", "time_zone": "CEST" }))
        .await;
    response.assert_status_ok();
    assert_eq!(token_of(&response.json::<Value>()), token_of(&user));

    // A different device tuple gets its own token.
    let response = app
        .server
        .post("/users/login")
        .add_header(AUTHORIZATION, basic("sheng", "12345678"))
        .json(&json!({ "os_name": "ios", "time_zone": "CEST" }))
        .await;
    response.assert_status_ok();
    assert_ne!(token_of(&response.json::<Value>()), token_of(&user));
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_unauthorized() {
    let app = spawn().await;
    signup(&app, "sheng").await;

    for credentials in [basic("sheng", "wrong"), basic("nobody", "12345678")] {
        let response = app
            .server
            .post("/users/login")
            .add_header(AUTHORIZATION, credentials)
            .json(&json!({ "os_name": "mac os", "time_zone": "CEST" }))
            .await;
        response.assert_status_unauthorized();
    }
}

#[tokio::test]
async fn test_logout_revokes_and_relogin_rotates() {
    let app = spawn().await;
    let user = signup(&app, "sheng").await;
    let token = token_of(&user);

    let response = app
        .server
        .delete("/users/logout")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "os_name": "mac os", "time_zone": "CEST" }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    // The revoked token no longer authenticates.
    get_authed(&app, &format!("/users/{}", id_of(&user)), &token)
        .await
        .assert_status_unauthorized();

    // Re-login mints a fresh value.
    let response = app
        .server
        .post("/users/login")
        .add_header(AUTHORIZATION, basic("sheng", "12345678"))
        .json(&json!({ "os_name": "mac os", "time_zone": "CEST" }))
        .await;
    response.assert_status_ok();
    assert_ne!(token_of(&response.json::<Value>()), token);
}

#[tokio::test]
async fn test_logout_from_wrong_device_is_not_found() {
    let app = spawn().await;
    let user = signup(&app, "sheng").await;

    let response = app
        .server
        .delete("/users/logout")
        .add_header(AUTHORIZATION, bearer(&token_of(&user)))
        .json(&json!({ "os_name": "ios", "time_zone": "CEST" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_profile_is_self_only() {
    let app = spawn().await;
    let sheng = signup(&app, "sheng").await;
    let bob = signup(&app, "bob").await;
    let token = token_of(&sheng);

    let response = get_authed(&app, &format!("/users/{}", id_of(&sheng)), &token).await;
    response.assert_status_ok();
    let profile = response.json::<Value>();
    assert_eq!(profile["username"], "sheng");
    // Token is only handed out on signup/login.
    assert!(profile["token"].is_null());

    // Someone else's id and a non-existent id read the same.
    get_authed(&app, &format!("/users/{}", id_of(&bob)), &token)
        .await
        .assert_status_unauthorized();
    get_authed(&app, "/users/no-such-id", &token)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = spawn().await;
    let user = signup(&app, "sheng").await;

    let response = app
        .server
        .put(&format!("/users/{}", id_of(&user)))
        .add_header(AUTHORIZATION, bearer(&token_of(&user)))
        .json(&json!({ "first_name": "Cheng", "email": "new@tally.dev" }))
        .await;
    response.assert_status_ok();

    let updated = response.json::<Value>();
    assert_eq!(updated["first_name"], "Cheng");
    assert_eq!(updated["last_name"], "Wu");
    assert_eq!(updated["email"], "new@tally.dev");
}

#[tokio::test]
async fn test_search_is_case_sensitive() {
    let app = spawn().await;
    let user = signup(&app, "shengwu").await;
    signup(&app, "ShengWu2").await;

    let response = get_authed(&app, "/users/search?q=sheng", &token_of(&user)).await;
    response.assert_status_ok();

    let hits = response.json::<Vec<Value>>();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["username"], "shengwu");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn().await;
    let user = signup(&app, "sheng").await;

    app.server
        .get(&format!("/users/{}", id_of(&user)))
        .await
        .assert_status_unauthorized();
    app.server
        .get("/users/search?q=x")
        .add_header(AUTHORIZATION, bearer("forged-token"))
        .await
        .assert_status_unauthorized();
}

// ============================================================================
// Friends
// ============================================================================

#[tokio::test]
async fn test_friendship_add_is_idempotent() {
    let app = spawn().await;
    let sheng = signup(&app, "sheng").await;
    let bob = signup(&app, "bob").await;
    let token = token_of(&sheng);

    for _ in 0..2 {
        let response = app
            .server
            .post(&format!("/users/{}/friends", id_of(&sheng)))
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "person_id": id_of(&bob) }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let response = get_authed(&app, &format!("/users/{}/friends", id_of(&sheng)), &token).await;
    response.assert_status_ok();
    let friends = response.json::<Vec<Value>>();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["username"], "bob");

    // The edge is symmetric.
    let response = get_authed(
        &app,
        &format!("/users/{}/friends", id_of(&bob)),
        &token_of(&bob),
    )
    .await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);
}

#[tokio::test]
async fn test_add_unknown_friend_is_bad_request() {
    let app = spawn().await;
    let sheng = signup(&app, "sheng").await;

    let response = app
        .server
        .post(&format!("/users/{}/friends", id_of(&sheng)))
        .add_header(AUTHORIZATION, bearer(&token_of(&sheng)))
        .json(&json!({ "person_id": "no-such-id" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_absent_friend_is_no_op() {
    let app = spawn().await;
    let sheng = signup(&app, "sheng").await;
    let bob = signup(&app, "bob").await;

    let response = app
        .server
        .delete(&format!("/users/{}/friends/{}", id_of(&sheng), id_of(&bob)))
        .add_header(AUTHORIZATION, bearer(&token_of(&sheng)))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_get_friend_without_edge_is_not_found() {
    let app = spawn().await;
    let sheng = signup(&app, "sheng").await;
    let bob = signup(&app, "bob").await;

    get_authed(
        &app,
        &format!("/users/{}/friends/{}", id_of(&sheng), id_of(&bob)),
        &token_of(&sheng),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_friends_list_is_self_only() {
    let app = spawn().await;
    let sheng = signup(&app, "sheng").await;
    let bob = signup(&app, "bob").await;

    get_authed(
        &app,
        &format!("/users/{}/friends", id_of(&bob)),
        &token_of(&sheng),
    )
    .await
    .assert_status_unauthorized();
}

// ============================================================================
// Avatars
// ============================================================================

fn avatar_form(filename: &str, bytes: &'static [u8]) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(bytes).file_name(filename))
}

#[tokio::test]
async fn test_avatar_upload_download_delete() {
    let app = spawn().await;
    let user = signup(&app, "sheng").await;
    let token = token_of(&user);

    let response = app
        .server
        .post(&format!("/users/{}/avatars", id_of(&user)))
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(avatar_form("me.png", b"png-bytes"))
        .await;
    response.assert_status_ok();
    let asset_id = id_of(&response.json::<Value>());

    let response = get_authed(
        &app,
        &format!("/users/{}/avatars/{}", id_of(&user), asset_id),
        &token,
    )
    .await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"png-bytes");

    // The avatar also shows up on the profile.
    let profile = get_authed(&app, &format!("/users/{}", id_of(&user)), &token)
        .await
        .json::<Value>();
    assert_eq!(profile["asset"]["id"], asset_id);

    let response = app
        .server
        .delete(&format!("/users/{}/avatars/{}", id_of(&user), asset_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_avatar_upload_replaces_previous() {
    let app = spawn().await;
    let user = signup(&app, "sheng").await;
    let token = token_of(&user);

    let first = app
        .server
        .post(&format!("/users/{}/avatars", id_of(&user)))
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(avatar_form("one.png", b"first"))
        .await
        .json::<Value>();

    let second = app
        .server
        .post(&format!("/users/{}/avatars", id_of(&user)))
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(avatar_form("two.png", b"second"))
        .await
        .json::<Value>();

    // Exactly one blob remains and it holds the second upload.
    assert_eq!(app.blobs.len(), 1);
    let response = get_authed(
        &app,
        &format!("/users/{}/avatars/{}", id_of(&user), id_of(&second)),
        &token,
    )
    .await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"second");

    // The first generation is gone, row included.
    get_authed(
        &app,
        &format!("/users/{}/avatars/{}", id_of(&user), id_of(&first)),
        &token,
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_avatar_routes_are_self_only() {
    let app = spawn().await;
    let sheng = signup(&app, "sheng").await;
    let bob = signup(&app, "bob").await;

    let response = app
        .server
        .post(&format!("/users/{}/avatars", id_of(&bob)))
        .add_header(AUTHORIZATION, bearer(&token_of(&sheng)))
        .multipart(avatar_form("me.png", b"png-bytes"))
        .await;
    response.assert_status_unauthorized();
}
