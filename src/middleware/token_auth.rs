//! Bearer token authentication middleware.
//!
//! Validates `Authorization: Bearer {token}` against the tokens table and
//! injects the owning user. Missing header, malformed header, unknown
//! token and revoked token are all the same `Unauthorized`.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{error::Error, AppState};

use super::AuthUser;

fn extract_bearer(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid bearer token.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let value = extract_bearer(&req)
        .ok_or(Error::Unauthorized)?
        .to_string();

    let user = state.tokens.authenticate(&value).await?;
    req.extensions_mut().insert(AuthUser { user });

    Ok(next.run(req).await)
}
