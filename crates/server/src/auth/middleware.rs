//! # Authentication Middleware
//!
//! Axum extractors that resolve who is calling:
//!
//! - `AuthenticatedUser`: a valid bearer token is required (401 otherwise).
//! - `OptionalUser`: no token resolves to `None`; a bad token is still a 401.
//! - `AdminUser`: like `AuthenticatedUser`, but the user must have the admin role (403).
//! - `Viewer`: an optional user plus an optional anonymous `X-Session-Id`,
//!   used for likes and the public timeline.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use core_access::{get_user_by_id, session_exists, User};
use ichidan::Liker;
use tracing::{error, info, warn};

use crate::{auth::token::decode_token, errors::error_response, state::AppState};

/// The header carrying an anonymous session id from `POST /api/sessions`.
pub const SESSION_HEADER: &str = "x-session-id";

/// A custom rejection type for authentication failures.
///
/// This allows the `FromRequestParts` implementations to return a specific
/// HTTP status code and error message, which Axum then turns into a response.
#[derive(Debug)]
pub struct AuthError(pub StatusCode, pub String);

impl AuthError {
    fn unauthorized(msg: &str) -> Self {
        AuthError(StatusCode::UNAUTHORIZED, msg.to_string())
    }

    fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        error!("{context}: {err}");
        AuthError(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal server error occurred.".to_string(),
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(self.0, self.1)
    }
}

/// Resolves the bearer token, if any, to a stored user.
async fn resolve_bearer(parts: &mut Parts, state: &AppState) -> Result<Option<User>, AuthError> {
    let bearer_header =
        Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                warn!("Malformed Authorization header: {e}");
                AuthError::unauthorized("Invalid Authorization header format.")
            })?;

    let Some(TypedHeader(Authorization(bearer))) = bearer_header else {
        return Ok(None);
    };

    let claims = decode_token(bearer.token(), &state.config.jwt_secret).map_err(|e| {
        warn!("JWT validation failed: {e}");
        AuthError::unauthorized("Invalid or expired token.")
    })?;

    let user = get_user_by_id(&state.sqlite_provider.db, &claims.sub)
        .await
        .map_err(|e| AuthError::internal("Failed to load user", e))?;

    match user {
        Some(user) => Ok(Some(user)),
        None => {
            warn!(user_id = %claims.sub, "Token refers to an unknown user.");
            Err(AuthError::unauthorized("Invalid or expired token."))
        }
    }
}

/// An Axum extractor that provides the currently authenticated user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_bearer(parts, state).await? {
            Some(user) => Ok(AuthenticatedUser(user)),
            None => {
                info!("No Authorization header on a route that requires sign-in.");
                Err(AuthError::unauthorized("Authentication required."))
            }
        }
    }
}

/// The signed-in user when a token is sent, `None` for anonymous callers.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(resolve_bearer(parts, state).await?))
    }
}

/// A signed-in user holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            warn!(user_id = %user.id, "Non-admin attempted an admin operation.");
            return Err(AuthError(
                StatusCode::FORBIDDEN,
                "Administrator role required.".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

/// Whoever is looking at public content.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub user: Option<User>,
    /// A session id that was checked to exist.
    pub session_id: Option<String>,
}

impl Viewer {
    /// The identity a like is stored under. A signed-in user wins over a session.
    pub fn liker(&self) -> Option<Liker> {
        match (&self.user, &self.session_id) {
            (Some(user), _) => Some(Liker::User(user.id.clone())),
            (None, Some(session)) => Some(Liker::Session(session.clone())),
            (None, None) => None,
        }
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_bearer(parts, state).await?;

        let session_id = match parts.headers.get(SESSION_HEADER) {
            None => None,
            Some(value) => {
                let id = value
                    .to_str()
                    .map(str::trim)
                    .map_err(|_| AuthError::unauthorized("Invalid session id."))?;
                let known = session_exists(&state.sqlite_provider.db, id)
                    .await
                    .map_err(|e| AuthError::internal("Failed to look up session", e))?;
                if !known {
                    warn!(session_id = %id, "Unknown anonymous session.");
                    return Err(AuthError::unauthorized("Unknown session id."));
                }
                Some(id.to_string())
            }
        };

        Ok(Viewer { user, session_id })
    }
}
