//! # Text Utility Handlers
//!
//! Server-side versions of the formatting the UI shows before copying a post:
//! the slug a tag name would get, and a platform-truncated text.

use super::{wrap_response, ApiResponse, AppError};
use crate::types::{FormatTextRequest, FormattedText, SlugPreview, SlugQuery};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Json,
};
use ichidan::text::{slugify, to_romaji, truncate_for_platform, weighted_length};

/// `GET /api/text/slug?text=...`
pub async fn slug_preview_handler(
    query: Result<Query<SlugQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SlugPreview>>, AppError> {
    let Query(SlugQuery { text }) = query?;
    let preview = SlugPreview {
        romaji: to_romaji(text.trim()),
        slug: slugify(&text),
        text,
    };
    Ok(wrap_response("Slug preview", preview))
}

/// `POST /api/text/format` with `{ "text": ..., "platform": "x" | "note" | "zenn" }`.
pub async fn format_text_handler(
    payload: Result<Json<FormatTextRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FormattedText>>, AppError> {
    let Json(request) = payload?;
    let (content, truncated) = truncate_for_platform(&request.text, request.platform);
    let formatted = FormattedText {
        weighted_length: weighted_length(&content),
        content,
        truncated,
    };
    Ok(wrap_response("Formatted", formatted))
}
