//! # Authentication Route Handlers
//!
//! The browser signs in with Google, posts the resulting ID token here, and
//! receives an application JWT to send as `Authorization: Bearer` afterwards.
//! Signed-out visitors can instead open an anonymous session for liking.

use super::{created, wrap_response, ApiResponse, AppError, AppState};
use crate::{
    auth::{middleware::AuthenticatedUser, token::issue_token},
    types::{GoogleSignInRequest, SignInResponse},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use core_access::{
    create_session, get_or_create_user, Session, User, UserProfile, ROLE_ADMIN, ROLE_USER,
};
use ichidan::IchidanError;
use tracing::info;

/// Whether `email` is on the configured admin list. Comparison ignores case.
pub(crate) fn is_admin_email(admin_emails: &[String], email: Option<&str>) -> bool {
    email.is_some_and(|email| {
        admin_emails
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(email.trim()))
    })
}

/// Exchanges a Google ID token for an application JWT.
pub async fn google_sign_in_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<GoogleSignInRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SignInResponse>>, AppError> {
    let Json(request) = payload?;
    if request.id_token.trim().is_empty() {
        return Err(IchidanError::validation("id_token must not be empty.").into());
    }

    let identity = app_state.id_verifier.verify(&request.id_token).await?;
    let role = if is_admin_email(&app_state.config.admin_emails, identity.email.as_deref()) {
        ROLE_ADMIN
    } else {
        ROLE_USER
    };
    let profile = UserProfile {
        subject: identity.subject,
        email: identity.email,
        display_name: identity.name,
        avatar_url: identity.picture,
    };
    let user = get_or_create_user(&app_state.sqlite_provider.db, &profile, role).await?;

    let ttl = app_state.config.jwt_ttl_secs;
    let token = issue_token(&user, &app_state.config.jwt_secret, ttl)
        .map_err(|e| anyhow::anyhow!("Failed to sign JWT: {e}"))?;
    info!(user_id = %user.id, role = %user.role, "User signed in with Google.");

    Ok(wrap_response(
        "Signed in",
        SignInResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: ttl,
            user,
        },
    ))
}

/// Returns the details of the currently authenticated user.
pub async fn get_me_handler(AuthenticatedUser(user): AuthenticatedUser) -> Json<ApiResponse<User>> {
    wrap_response("Current user", user)
}

/// Opens an anonymous session whose id can be sent as `X-Session-Id`.
pub async fn create_session_handler(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Session>>), AppError> {
    let session = create_session(&app_state.sqlite_provider.db).await?;
    Ok(created("Session created", session))
}
