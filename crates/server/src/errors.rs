use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_access::CoreAccessError;
use ichidan::IchidanError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `ichidan` library.
    Ichidan(IchidanError),
    /// Errors originating from the identity layer.
    Access(CoreAccessError),
    /// Malformed input caught before reaching the library.
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<IchidanError> for AppError {
    fn from(err: IchidanError) -> Self {
        AppError::Ichidan(err)
    }
}

impl From<CoreAccessError> for AppError {
    fn from(err: CoreAccessError) -> Self {
        AppError::Access(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn status_and_detail(self) -> (StatusCode, String) {
        match self {
            AppError::Ichidan(err) => match err {
                IchidanError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                IchidanError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
                IchidanError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
                IchidanError::Identity(msg) => {
                    warn!("Rejected identity token: {msg}");
                    (StatusCode::UNAUTHORIZED, "Invalid ID token.".to_string())
                }
                IchidanError::AiRequest(e) => {
                    error!("AI request error: {e:?}");
                    (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI provider failed: {e}"),
                    )
                }
                IchidanError::AiDeserialization(e) => {
                    error!("AI deserialization error: {e:?}");
                    (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize AI provider response: {e}"),
                    )
                }
                IchidanError::AiApi(e) => {
                    error!("AI provider error: {e}");
                    (StatusCode::BAD_GATEWAY, format!("AI provider error: {e}"))
                }
                other => {
                    error!("IchidanError: {other:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal server error occurred.".to_string(),
                    )
                }
            },
            AppError::Access(err) => {
                error!("CoreAccessError: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(err) => {
                error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        }
    }
}

/// Builds the failure envelope shared by handlers and extractors.
pub fn error_response(status: StatusCode, detail: String) -> Response {
    let message = status.canonical_reason().unwrap_or("Error");
    let body = Json(json!({
        "message": message,
        "error": detail,
    }));
    (status, body).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        error_response(status, detail)
    }
}
