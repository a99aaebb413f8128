//! # Reading Record Handlers
//!
//! Record CRUD for the signed-in owner, the public timeline, likes and the
//! habit statistics shown on the personal page.

use super::{created, parse_id, wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::{AuthenticatedUser, Viewer};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use ichidan::{
    likes, records, stats, LikeStatus, NewReadingRecord, Pagination, ReadingRecord, TimelineEntry,
    TimelineQuery, UpdateReadingRecord, UserStats,
};
use serde_json::{json, Value};
use tracing::info;

/// Lists the caller's own records, newest first.
pub async fn list_records_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ReadingRecord>>>, AppError> {
    let Query(page) = query?;
    let list = records::list_user_records(&app_state.sqlite_provider.db, &user.id, page).await?;
    Ok(wrap_response(format!("Found {} record(s)", list.len()), list))
}

pub async fn create_record_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<NewReadingRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ReadingRecord>>), AppError> {
    let Json(input) = payload?;
    info!(user_id = %user.id, title = %input.title, "Creating reading record.");
    let record = records::create_record(&app_state.sqlite_provider.db, &user.id, input).await?;
    Ok(created("Record created", record))
}

pub async fn get_record_handler(
    State(app_state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<ReadingRecord>>, AppError> {
    let id = parse_id(&raw_id, "record")?;
    let record = records::get_record(&app_state.sqlite_provider.db, id).await?;
    Ok(wrap_response("Record found", record))
}

/// Partially updates a record. Non-owners get a 404.
pub async fn update_record_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateReadingRecord>, JsonRejection>,
) -> Result<Json<ApiResponse<ReadingRecord>>, AppError> {
    let id = parse_id(&raw_id, "record")?;
    let Json(update) = payload?;
    let record = records::update_record(&app_state.sqlite_provider.db, &user.id, id, update).await?;
    Ok(wrap_response("Record updated", record))
}

pub async fn delete_record_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = parse_id(&raw_id, "record")?;
    records::delete_record(&app_state.sqlite_provider.db, &user.id, id).await?;
    Ok(wrap_response("Record deleted", json!({ "id": id })))
}

/// The public timeline. Anonymous callers see everything unmasked.
pub async fn timeline_handler(
    State(app_state): State<AppState>,
    viewer: Viewer,
    query: Result<Query<TimelineQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<TimelineEntry>>>, AppError> {
    let Query(query) = query?;
    let liker = viewer.liker();
    let entries = records::timeline(&app_state.sqlite_provider.db, &query, liker.as_ref()).await?;
    Ok(wrap_response(format!("Found {} record(s)", entries.len()), entries))
}

pub async fn like_status_handler(
    State(app_state): State<AppState>,
    viewer: Viewer,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<LikeStatus>>, AppError> {
    let id = parse_id(&raw_id, "record")?;
    let liker = viewer.liker();
    let status = likes::like_status(&app_state.sqlite_provider.db, id, liker.as_ref()).await?;
    Ok(wrap_response("Like status", status))
}

/// Likes a record as the signed-in user or the anonymous session. Idempotent.
pub async fn like_handler(
    State(app_state): State<AppState>,
    viewer: Viewer,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<LikeStatus>>, AppError> {
    let id = parse_id(&raw_id, "record")?;
    let liker = require_liker(&viewer)?;
    let status = likes::like_record(&app_state.sqlite_provider.db, id, &liker).await?;
    Ok(wrap_response("Liked", status))
}

pub async fn unlike_handler(
    State(app_state): State<AppState>,
    viewer: Viewer,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<LikeStatus>>, AppError> {
    let id = parse_id(&raw_id, "record")?;
    let liker = require_liker(&viewer)?;
    let status = likes::unlike_record(&app_state.sqlite_provider.db, id, &liker).await?;
    Ok(wrap_response("Unliked", status))
}

fn require_liker(viewer: &Viewer) -> Result<ichidan::Liker, AppError> {
    viewer.liker().ok_or_else(|| {
        AppError::Unauthorized(
            "Sign in or send an X-Session-Id header to like records.".to_string(),
        )
    })
}

/// Habit statistics for the caller, with days counted in the configured offset.
pub async fn stats_handler(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ApiResponse<UserStats>>, AppError> {
    let stats =
        stats::user_stats(&app_state.sqlite_provider.db, &user.id, app_state.timezone).await?;
    Ok(wrap_response("Reading stats", stats))
}
