//! Admin Auth Handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::AdminUserRepository;
use crate::utils::{AppError, AppResult};
use shared::AdminUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Verify admin credentials.
///
/// Missing user, wrong password and deactivated account all produce the
/// same response, so usernames cannot be probed.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AdminUser>> {
    let repo = AdminUserRepository::new(state.db.clone());
    let user = repo
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::invalid_credentials());
    }

    let verified = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(AppError::invalid_credentials());
    }

    tracing::info!(username = %user.username, "Admin logged in");
    Ok(Json(user))
}
