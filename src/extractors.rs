use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::auth::token::{verify_admin_token, AdminClaims, ADMIN_ROLE};
use crate::error::AppError;
use crate::state::AppState;

/// Extractor guarding admin-only routes.
///
/// Expects `Authorization: Bearer <token>`. Every failure mode (missing
/// header, malformed value, bad signature, expired token) maps to the same
/// 401 so callers cannot probe which check tripped.
pub struct AdminToken(pub AdminClaims);

impl FromRequestParts<AppState> for AdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = verify_admin_token(token, state.config.auth.token_secret.as_bytes())
            .map_err(|_| AppError::Unauthorized)?;

        if claims.role != ADMIN_ROLE {
            return Err(AppError::Unauthorized);
        }

        Ok(AdminToken(claims))
    }
}
