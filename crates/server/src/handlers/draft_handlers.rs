//! # Draft Generation Handler

use super::{wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::AuthenticatedUser;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ichidan::{drafts, Draft, DraftRequest};
use tracing::info;

/// Generates a draft post from the records filed under one of the caller's themes.
///
/// Provider failures never surface here: the library falls back to a template
/// and reports `source: "template"`.
pub async fn generate_draft_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<DraftRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Draft>>, AppError> {
    let Json(request) = payload?;
    info!(
        user_id = %user.id,
        theme_id = request.theme_id,
        platform = request.platform.label(),
        "Draft requested."
    );
    let draft = drafts::generate_draft(
        &app_state.sqlite_provider.db,
        app_state.ai_provider.as_deref(),
        &app_state.draft_prompts,
        &user.id,
        request,
    )
    .await?;
    Ok(wrap_response("Draft generated", draft))
}
