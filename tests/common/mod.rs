//! Shared helpers for API integration tests.
//!
//! Spins up the real router over an in-memory SQLite pool and an in-memory
//! blob store, driven with axum-test.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tally::api;
use tally::db::{init_pool, initialize_schema};
use tally::services::MemoryBlobStore;
use tally::AppState;

pub struct TestApp {
    pub server: TestServer,
    pub blobs: Arc<MemoryBlobStore>,
}

pub async fn spawn() -> TestApp {
    let pool = init_pool(":memory:").await.unwrap();
    initialize_schema(&pool).await.unwrap();

    let blobs = Arc::new(MemoryBlobStore::new());
    let state = AppState::assemble(pool, blobs.clone());

    let app = Router::new()
        .merge(api::routes(state.clone()))
        .with_state(state);

    TestApp {
        server: TestServer::new(app).unwrap(),
        blobs,
    }
}

/// Bearer Authorization header value.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Basic Authorization header value.
pub fn basic(username: &str, password: &str) -> HeaderValue {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    HeaderValue::from_str(&format!("Basic {}", encoded)).unwrap()
}

pub fn signup_body(username: &str) -> Value {
    json!({
        "user_info": {
            "first_name": "Sheng",
            "last_name": "Wu",
            "username": username,
            "email": format!("{}@tally.dev", username),
            "password": "12345678"
        },
        "os_name": "mac os",
        "time_zone": "CEST"
    })
}

/// Sign up a user and return their public representation (includes `token`).
pub async fn signup(app: &TestApp, username: &str) -> Value {
    let response = app
        .server
        .post("/users/signup")
        .json(&signup_body(username))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

pub fn token_of(user: &Value) -> String {
    user["token"].as_str().unwrap().to_string()
}

pub fn id_of(user: &Value) -> String {
    user["id"].as_str().unwrap().to_string()
}

/// An authorized GET, the most common shape in these tests.
pub async fn get_authed(app: &TestApp, path: &str, token: &str) -> axum_test::TestResponse {
    app.server
        .get(path)
        .add_header(AUTHORIZATION, bearer(token))
        .await
}
