//! Bearer-token extractor guarding the creator profile endpoints.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use canopy_core::error::CoreError;
use canopy_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The creator identified by the request's `Authorization: Bearer` token.
///
/// Adding this parameter to a handler makes the route require a valid
/// access token; every rejection surfaces as a 401 through [`AppError`].
#[derive(Debug, Clone)]
pub struct AuthCreator {
    /// Creator's database id, from the token's `sub` claim.
    pub creator_id: DbId,
    /// Role name from the token's `role` claim.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthCreator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthCreator {
            creator_id: claims.sub,
            role: claims.role,
        })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}
