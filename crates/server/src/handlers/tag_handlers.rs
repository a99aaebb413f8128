//! # Tag Catalog Handlers
//!
//! Anyone can read the catalog; only admins change it.

use super::{created, parse_id, wrap_response, ApiResponse, AppError, AppState};
use crate::{
    auth::middleware::AdminUser,
    types::{BookTitleQuery, BookTitleRequest, CreateTagRequest},
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use ichidan::{tags, Tag};
use serde_json::{json, Value};
use tracing::info;

pub async fn list_tags_handler(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Tag>>>, AppError> {
    let list = tags::list_tags(&app_state.sqlite_provider.db).await?;
    Ok(wrap_response(format!("Found {} tag(s)", list.len()), list))
}

pub async fn create_tag_handler(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    payload: Result<Json<CreateTagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Tag>>), AppError> {
    let Json(request) = payload?;
    let tag = tags::create_tag(&app_state.sqlite_provider.db, &request.name).await?;
    info!(admin_id = %admin.id, slug = %tag.slug, "Tag created.");
    Ok(created("Tag created", tag))
}

pub async fn delete_tag_handler(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = parse_id(&raw_id, "tag")?;
    tags::delete_tag(&app_state.sqlite_provider.db, id).await?;
    info!(admin_id = %admin.id, tag_id = id, "Tag deleted.");
    Ok(wrap_response("Tag deleted", json!({ "id": id })))
}

pub async fn attach_book_handler(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<BookTitleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = parse_id(&raw_id, "tag")?;
    let Json(request) = payload?;
    tags::attach_book(&app_state.sqlite_provider.db, id, &request.book_title).await?;
    Ok(wrap_response(
        "Book tagged",
        json!({ "tag_id": id, "book_title": request.book_title.trim() }),
    ))
}

pub async fn detach_book_handler(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<BookTitleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = parse_id(&raw_id, "tag")?;
    let Json(request) = payload?;
    tags::detach_book(&app_state.sqlite_provider.db, id, &request.book_title).await?;
    Ok(wrap_response(
        "Book untagged",
        json!({ "tag_id": id, "book_title": request.book_title.trim() }),
    ))
}

/// `GET /api/books/tags?title=...`
pub async fn book_tags_handler(
    State(app_state): State<AppState>,
    query: Result<Query<BookTitleQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Tag>>>, AppError> {
    let Query(query) = query?;
    let list = tags::tags_for_book(&app_state.sqlite_provider.db, &query.title).await?;
    Ok(wrap_response(format!("Found {} tag(s)", list.len()), list))
}
