//! Request authentication
//!
//! Extracts the authenticated owner from a bearer session token. Handlers
//! take the owner as an explicit parameter; there is no ambient session
//! state. A missing or unknown token is rejected with 401, never treated
//! as an anonymous caller.

use crate::{db, ApiError, AppState};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use uuid::Uuid;

/// The authenticated owner of the current request
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        // A lookup failure (db down) is an internal error, not a 401
        let owner = db::sessions::lookup_owner(&state.db, token)
            .await
            .map_err(ApiError::Common)?;

        match owner {
            Some(owner) => Ok(AuthedUser(owner)),
            None => Err(ApiError::Unauthorized),
        }
    }
}
