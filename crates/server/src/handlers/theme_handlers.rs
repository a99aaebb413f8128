//! # Theme Handlers
//!
//! Themes are private to their owner; another user's theme id is a 404.

use super::{created, parse_id, wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use ichidan::{themes, NewTheme, Theme, ThemeSummary, UpdateTheme};
use serde_json::{json, Value};

pub async fn list_themes_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<ThemeSummary>>>, AppError> {
    let list = themes::list_themes(&app_state.sqlite_provider.db, &user.id).await?;
    Ok(wrap_response(format!("Found {} theme(s)", list.len()), list))
}

pub async fn create_theme_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<NewTheme>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Theme>>), AppError> {
    let Json(input) = payload?;
    let theme = themes::create_theme(&app_state.sqlite_provider.db, &user.id, input).await?;
    Ok(created("Theme created", theme))
}

pub async fn update_theme_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateTheme>, JsonRejection>,
) -> Result<Json<ApiResponse<Theme>>, AppError> {
    let id = parse_id(&raw_id, "theme")?;
    let Json(update) = payload?;
    let theme = themes::update_theme(&app_state.sqlite_provider.db, &user.id, id, update).await?;
    Ok(wrap_response("Theme updated", theme))
}

/// Deletes a theme. Its records stay, detached.
pub async fn delete_theme_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = parse_id(&raw_id, "theme")?;
    themes::delete_theme(&app_state.sqlite_provider.db, &user.id, id).await?;
    Ok(wrap_response("Theme deleted", json!({ "id": id })))
}
