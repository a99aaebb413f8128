use super::{wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ichidan::{settings, UpdateSettings, UserSettings};

pub async fn get_settings_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ApiResponse<UserSettings>>, AppError> {
    let current = settings::get_settings(&app_state.sqlite_provider.db, &user.id).await?;
    Ok(wrap_response("Settings", current))
}

/// Merges the sent fields into the stored settings.
pub async fn update_settings_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<UpdateSettings>, JsonRejection>,
) -> Result<Json<ApiResponse<UserSettings>>, AppError> {
    let Json(update) = payload?;
    let saved = settings::update_settings(&app_state.sqlite_provider.db, &user.id, update).await?;
    Ok(wrap_response("Settings updated", saved))
}
