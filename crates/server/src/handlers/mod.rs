//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `ichidan-server`.
//! The handlers are split into logical sub-modules based on the resource they
//! serve (records, tags, themes, ...).

// Sub-modules for different handler categories.
pub mod admin_handlers;
pub mod auth_handlers;
pub mod draft_handlers;
pub mod general;
pub mod record_handlers;
pub mod settings_handlers;
pub mod tag_handlers;
pub mod text_handlers;
pub mod theme_handlers;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use admin_handlers::*;
pub use auth_handlers::*;
pub use draft_handlers::*;
pub use general::*;
pub use record_handlers::*;
pub use settings_handlers::*;
pub use tag_handlers::*;
pub use text_handlers::*;
pub use theme_handlers::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState, types::ApiResponse};
use axum::{http::StatusCode, Json};

/// Wraps a successful result in the standard `ApiResponse` envelope.
pub(crate) fn wrap_response<T>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        message: message.into(),
        data,
    })
}

/// Like `wrap_response`, with a `201 Created` status.
pub(crate) fn created<T>(
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, wrap_response(message, data))
}

/// Parses a numeric path id, rejecting anything else with a 400.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {what} id '{raw}'.")))
}
