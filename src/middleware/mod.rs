//! Authentication middleware.
//!
//! Two schemes, applied per-route:
//! - `token_auth` - Bearer token validation for every authenticated route
//! - `basic_auth` - username/password validation, used only by login
//!
//! Both inject `AuthUser` into request extensions on success; handlers
//! take it back out with `Extension<AuthUser>`.

mod basic_auth;
mod token_auth;

pub use basic_auth::require_basic;
pub use token_auth::require_token;

use crate::models::User;

/// The authenticated caller, resolved by whichever scheme guarded the route.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
}
