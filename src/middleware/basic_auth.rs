//! Basic authentication middleware, used only by the login route.
//!
//! Parses `Authorization: Basic {base64(username:password)}`, verifies the
//! password against the stored digest and injects the user. Any failure
//! along the way is the same `Unauthorized`; bad credentials never learn
//! whether the username exists.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::services::password;
use crate::{db, error::Error, AppState};

fn extract_credentials(req: &Request<Body>) -> Option<(String, String)> {
    let encoded = req
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let pair = String::from_utf8(decoded).ok()?;
    let (username, pass) = pair.split_once(':')?;
    Some((username.to_string(), pass.to_string()))
}

/// Middleware that requires valid Basic credentials.
pub async fn require_basic(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let (username, pass) = extract_credentials(&req).ok_or(Error::Unauthorized)?;

    let user = db::get_user_by_username(&state.db, &username)
        .await?
        .ok_or(Error::Unauthorized)?;

    if !password::verify(&pass, &user.password_digest) {
        return Err(Error::Unauthorized);
    }

    req.extensions_mut().insert(super::AuthUser { user });
    Ok(next.run(req).await)
}
