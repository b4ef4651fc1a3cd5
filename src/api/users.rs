//! User routes.
//!
//! Routes:
//! - POST /users/signup - Create an account (public)
//! - POST /users/login - Exchange Basic credentials for a token
//! - DELETE /users/logout - Revoke the current device's token
//! - GET/PUT /users/:user_id - Own profile
//! - GET /users/search?q= - Username substring search
//! - GET/POST /users/:user_id/friends - Friends list / add
//! - GET/DELETE /users/:user_id/friends/:person_id - One friend / remove
//! - POST /users/:user_id/avatars - Upload (replaces the current avatar)
//! - GET/DELETE /users/:user_id/avatars/:avatar_id - Download / remove

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::db::{self, UpdateUser};
use crate::middleware::{require_basic, require_token, AuthUser};
use crate::models::{Asset, PublicUser, User};
use crate::services::{guard, password};
use crate::{AppState, Error, Result};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/signup", post(signup));

    let basic = Router::new()
        .route("/login", post(login))
        .layer(middleware::from_fn_with_state(state.clone(), require_basic));

    let protected = Router::new()
        .route("/logout", delete(logout))
        .route("/search", get(search))
        .route("/:user_id", get(get_one).put(update))
        .route("/:user_id/friends", get(list_friends).post(add_friend))
        .route(
            "/:user_id/friends/:person_id",
            get(get_friend).delete(remove_friend),
        )
        .route("/:user_id/avatars", post(upload_avatar))
        .route(
            "/:user_id/avatars/:avatar_id",
            get(download_avatar).delete(delete_avatar),
        )
        .layer(middleware::from_fn_with_state(state, require_token));

    public.merge(basic).merge(protected)
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct UserInfo {
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SignupRequest {
    /// Absent user_info is a `BadRequest`, not a deserialization failure,
    /// so the client gets the structured error envelope.
    user_info: Option<UserInfo>,
    os_name: String,
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct DeviceInfo {
    os_name: String,
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct UpdateUserRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

#[derive(Debug, Deserialize)]
struct AddFriendRequest {
    person_id: String,
}

// ============================================================================
// Handlers
// ============================================================================

async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<PublicUser>> {
    let info = body
        .user_info
        .ok_or_else(|| Error::BadRequest("Missing user_info".to_string()))?;

    let digest = password::hash(&info.password)?;
    let user = db::create_user(
        &state.db,
        &User::new(
            info.first_name,
            info.last_name,
            info.username,
            info.email,
            digest,
        ),
    )
    .await?;

    let token = state
        .tokens
        .issue_or_reuse(&user, &body.os_name, &body.time_zone)
        .await?;

    Ok(Json(
        db::make_public_user(&state.db, user, Some(token.value)).await?,
    ))
}

async fn login(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<DeviceInfo>,
) -> Result<Json<PublicUser>> {
    let token = state
        .tokens
        .issue_or_reuse(&auth.user, &body.os_name, &body.time_zone)
        .await?;

    Ok(Json(
        db::make_public_user(&state.db, auth.user, Some(token.value)).await?,
    ))
}

async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<DeviceInfo>,
) -> Result<StatusCode> {
    state
        .tokens
        .revoke(&auth.user, &body.os_name, &body.time_zone)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicUser>> {
    guard::require_self(&auth.user, &user_id)?;
    Ok(Json(db::make_public_user(&state.db, auth.user, None).await?))
}

async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>> {
    guard::require_self(&auth.user, &user_id)?;

    let updated = db::update_user(
        &state.db,
        &user_id,
        UpdateUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
        },
    )
    .await?;

    Ok(Json(db::make_public_user(&state.db, updated, None).await?))
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PublicUser>>> {
    let users = db::search_users(&state.db, &query.q).await?;
    Ok(Json(db::make_public_users(&state.db, users).await?))
}

// ============================================================================
// Friends
// ============================================================================

async fn list_friends(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PublicUser>>> {
    guard::require_self(&auth.user, &user_id)?;
    let friends = state.friendships.list_friends(&auth.user).await?;
    Ok(Json(db::make_public_users(&state.db, friends).await?))
}

async fn add_friend(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(body): Json<AddFriendRequest>,
) -> Result<StatusCode> {
    guard::require_self(&auth.user, &user_id)?;
    state.friendships.add(&auth.user, &body.person_id).await?;
    Ok(StatusCode::CREATED)
}

async fn get_friend(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, person_id)): Path<(String, String)>,
) -> Result<Json<PublicUser>> {
    guard::require_self(&auth.user, &user_id)?;
    let friend = state.friendships.get_one(&auth.user, &person_id).await?;
    Ok(Json(db::make_public_user(&state.db, friend, None).await?))
}

async fn remove_friend(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, person_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    guard::require_self(&auth.user, &user_id)?;
    state.friendships.remove(&auth.user, &person_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Avatars
// ============================================================================

async fn upload_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Asset>> {
    guard::require_self(&auth.user, &user_id)?;

    let (filename, bytes) = super::read_upload(multipart).await?;
    let avatar = state
        .assets
        .upload_avatar(&auth.user.id, filename, &bytes)
        .await?;

    Ok(Json(Asset::from(avatar)))
}

async fn download_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, avatar_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    guard::require_self(&auth.user, &user_id)?;

    let avatar = guard::require_attached(state.assets.get_avatar(&avatar_id).await?, &user_id)?;
    let bytes = state.assets.download_avatar(&avatar).await?;
    Ok(super::blob_response(&avatar.filename, bytes))
}

async fn delete_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, avatar_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    guard::require_self(&auth.user, &user_id)?;

    let avatar = guard::require_attached(state.assets.get_avatar(&avatar_id).await?, &user_id)?;
    state.assets.delete_avatar(&avatar).await?;
    Ok(StatusCode::NO_CONTENT)
}
