//! API routes.
//!
//! Combines all route groups into a single router. Route structure:
//! - /users/* - signup (public), login (basic), profile, friends, avatars
//! - /records/* - record CRUD and attachments (bearer)

mod records;
mod users;

use axum::extract::Multipart;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Router;

use crate::{AppState, Error, Result};

/// Build the complete API router.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", users::routes(state.clone()))
        .nest("/records", records::routes(state))
}

/// Pull the single `file` part out of a multipart upload.
///
/// Returns the client-supplied filename and the raw bytes. Anything else -
/// missing part, missing filename, truncated body - is a `BadRequest`.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| Error::BadRequest("Upload is missing a filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("Malformed multipart body: {}", e)))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(Error::BadRequest("Upload is missing a 'file' part".to_string()))
}

/// Serve stored bytes with Content-Type guessed from the original filename
/// and a download-friendly Content-Disposition.
pub(crate) fn blob_response(filename: &str, bytes: Vec<u8>) -> impl IntoResponse {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    (headers, bytes)
}
