//! Session token service.
//!
//! Tokens are opaque random values bound to a (user, os_name, time_zone)
//! device fingerprint. Device scoping lets one account run on multiple
//! clients with independent logout, while re-login from the same device
//! reuses the still-active token instead of minting a duplicate.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use tracing::debug;

use crate::db::{self, DbPool};
use crate::models::{Token, User};
use crate::{Error, Result};

#[derive(Clone)]
pub struct TokenService {
    db: DbPool,
}

impl TokenService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Return the active token for this exact device tuple, or mint a new
    /// one if none exists (first login, or the previous token was revoked).
    ///
    /// Invariant: at most one active token per (user, os_name, time_zone)
    /// at completion of a login flow.
    pub async fn issue_or_reuse(
        &self,
        user: &User,
        os_name: &str,
        time_zone: &str,
    ) -> Result<Token> {
        if let Some(existing) =
            db::get_active_device_token(&self.db, &user.id, os_name, time_zone).await?
        {
            debug!(user = %user.id, os_name, "reusing active token");
            return Ok(existing);
        }

        let token = Token::new(
            user.id.clone(),
            generate_token_value(),
            os_name.to_string(),
            time_zone.to_string(),
        );
        db::create_token(&self.db, &token).await
    }

    /// Resolve a bearer token value to its owning user. Absent or revoked
    /// tokens are both `Unauthorized`; this runs on every authenticated
    /// request.
    pub async fn authenticate(&self, value: &str) -> Result<User> {
        let token = db::get_token_by_value(&self.db, value)
            .await?
            .filter(|t| !t.is_revoked)
            .ok_or(Error::Unauthorized)?;

        db::get_user(&self.db, &token.user_id)
            .await?
            .ok_or(Error::Unauthorized)
    }

    /// Revoke the active token for a device tuple. A tuple that matches no
    /// active token is `NotFound` - distinct from `Unauthorized`, which is
    /// reserved for the authentication step.
    pub async fn revoke(&self, user: &User, os_name: &str, time_zone: &str) -> Result<()> {
        let token = db::get_active_device_token(&self.db, &user.id, os_name, time_zone)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("No active token for device {}/{}", os_name, time_zone))
            })?;

        db::revoke_token(&self.db, &token.id).await
    }
}

/// 32 random bytes, URL-safe base64. Never derived from user data.
fn generate_token_value() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
