//! Record routes.
//!
//! Routes:
//! - GET/POST /records - List / create
//! - GET/PUT/DELETE /records/:record_id - Read / update / soft-delete
//! - POST /records/:record_id/attachments - Upload an attachment
//! - GET/DELETE /records/:record_id/attachments/:attachment_id - Download / remove
//!
//! Every route resolves ownership through the record first. Soft-deleted
//! records are invisible to read, update, delete and attachment upload;
//! existing attachments stay downloadable and deletable afterwards.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::middleware::{require_token, AuthUser};
use crate::models::{Asset, IntactRecord, RecordBody};
use crate::services::guard;
use crate::{AppState, Result};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:record_id", get(get_one).put(update).delete(delete_one))
        .route("/:record_id/attachments", post(upload_attachment))
        .route(
            "/:record_id/attachments/:attachment_id",
            get(download_attachment).delete(delete_attachment),
        )
        .layer(middleware::from_fn_with_state(state, require_token))
}

async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<IntactRecord>>> {
    Ok(Json(state.records.list(&auth.user).await?))
}

async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<RecordBody>,
) -> Result<Json<IntactRecord>> {
    Ok(Json(state.records.create(&auth.user, &body).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(record_id): Path<String>,
) -> Result<Json<IntactRecord>> {
    Ok(Json(state.records.get_intact(&auth.user, &record_id).await?))
}

async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(record_id): Path<String>,
    Json(body): Json<RecordBody>,
) -> Result<Json<IntactRecord>> {
    Ok(Json(state.records.update(&auth.user, &record_id, &body).await?))
}

async fn delete_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(record_id): Path<String>,
) -> Result<StatusCode> {
    state.records.delete(&auth.user, &record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Attachments
// ============================================================================

async fn upload_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(record_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Asset>> {
    // Attaching to a soft-deleted record reads as absent.
    let record = state.records.owned_active(&auth.user, &record_id).await?;

    let (filename, bytes) = super::read_upload(multipart).await?;
    let attachment = state
        .assets
        .upload_attachment(&record.id, filename, &bytes)
        .await?;

    Ok(Json(Asset::from(attachment)))
}

async fn download_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((record_id, attachment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let record = state.records.owned(&auth.user, &record_id).await?;

    let attachment = guard::require_attached(
        state.assets.get_attachment(&attachment_id).await?,
        &record.id,
    )?;
    let bytes = state.assets.download_attachment(&attachment).await?;
    Ok(super::blob_response(&attachment.filename, bytes))
}

async fn delete_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((record_id, attachment_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let record = state.records.owned(&auth.user, &record_id).await?;

    let attachment = guard::require_attached(
        state.assets.get_attachment(&attachment_id).await?,
        &record.id,
    )?;
    state.assets.delete_attachment(&attachment).await?;
    Ok(StatusCode::NO_CONTENT)
}
