use super::{handlers, state::AppState};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::middleware::SESSION_HEADER;

/// Builds the CORS layer for the browser frontend. An empty origin list allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(SESSION_HEADER),
        ]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'.");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.cors_allowed_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Auth
        .route("/api/auth/google", post(handlers::google_sign_in_handler))
        .route("/api/auth/me", get(handlers::get_me_handler))
        .route("/api/sessions", post(handlers::create_session_handler))
        // Records
        .route(
            "/api/records",
            get(handlers::list_records_handler).post(handlers::create_record_handler),
        )
        .route(
            "/api/records/{id}",
            get(handlers::get_record_handler)
                .put(handlers::update_record_handler)
                .delete(handlers::delete_record_handler),
        )
        .route(
            "/api/records/{id}/like",
            get(handlers::like_status_handler)
                .post(handlers::like_handler)
                .delete(handlers::unlike_handler),
        )
        .route("/api/timeline", get(handlers::timeline_handler))
        .route("/api/stats", get(handlers::stats_handler))
        // Tag catalog
        .route(
            "/api/tags",
            get(handlers::list_tags_handler).post(handlers::create_tag_handler),
        )
        .route(
            "/api/tags/{id}",
            delete(handlers::delete_tag_handler),
        )
        .route(
            "/api/tags/{id}/books",
            post(handlers::attach_book_handler).delete(handlers::detach_book_handler),
        )
        .route("/api/books/tags", get(handlers::book_tags_handler))
        // Themes, settings, drafts
        .route(
            "/api/themes",
            get(handlers::list_themes_handler).post(handlers::create_theme_handler),
        )
        .route(
            "/api/themes/{id}",
            put(handlers::update_theme_handler).delete(handlers::delete_theme_handler),
        )
        .route(
            "/api/settings",
            get(handlers::get_settings_handler).put(handlers::update_settings_handler),
        )
        .route("/api/drafts", post(handlers::generate_draft_handler))
        // Admin
        .route("/api/admin/users", get(handlers::list_users_handler))
        // Text utilities
        .route("/api/text/slug", get(handlers::slug_preview_handler))
        .route("/api/text/format", post(handlers::format_text_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
