//! # Admin Handlers

use super::{wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::AdminUser;
use axum::{extract::State, Json};
use core_access::{list_users, User};
use tracing::info;

/// Lists every user, newest first.
pub async fn list_users_handler(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    info!(admin_id = %admin.id, "Admin listing users.");
    let users = list_users(&app_state.sqlite_provider.db).await?;
    Ok(wrap_response(format!("Found {} user(s)", users.len()), users))
}
