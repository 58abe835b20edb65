use axum::extract::State;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::password::{set_admin_password, verify_admin_password};
use crate::auth::token::issue_admin_token;
use crate::error::{AppError, AppResult};
use crate::extractors::AdminToken;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/verify", post(verify))
        .route("/api/admin/password", put(change_password))
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub token: String,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// POST /api/admin/verify — exchange the shared password for a signed token.
async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> AppResult<Json<VerifyResponse>> {
    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Password is required".into()))?;

    if !verify_admin_password(&state.db, password)? {
        return Err(AppError::Unauthorized);
    }

    let token = issue_admin_token(
        state.config.auth.token_secret.as_bytes(),
        state.config.auth.token_hours,
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(VerifyResponse {
        token,
        message: "Login successful".to_string(),
    }))
}

/// PUT /api/admin/password — rotate the shared password. Requires a valid
/// token plus the current password.
async fn change_password(
    State(state): State<AppState>,
    AdminToken(_claims): AdminToken,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let current = req
        .current_password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Current password is required".into()))?;
    let new_password = req
        .new_password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("New password is required".into()))?;

    if !verify_admin_password(&state.db, current)? {
        return Err(AppError::Unauthorized);
    }

    set_admin_password(&state.db, new_password)?;
    tracing::info!("Admin password changed");

    Ok(Json(json!({ "message": "Password updated" })))
}
