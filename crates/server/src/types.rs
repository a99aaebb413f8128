//! Wire types owned by the HTTP layer. Domain payloads live in `ichidan::types`.

use core_access::User;
use serde::{Deserialize, Serialize};

/// The success envelope: `{ "message": ..., "data": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct GoogleSignInRequest {
    pub id_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BookTitleRequest {
    pub book_title: String,
}

#[derive(Debug, Deserialize)]
pub struct BookTitleQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlugPreview {
    pub text: String,
    /// `None` when some character has no romaji reading.
    pub romaji: Option<String>,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct FormatTextRequest {
    pub text: String,
    pub platform: ichidan::DraftPlatform,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormattedText {
    pub content: String,
    pub truncated: bool,
    pub weighted_length: usize,
}
