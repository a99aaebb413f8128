//! # Server Smoke Tests
//!
//! Liveness routes, CORS headers and the error envelope for unknown routes.

mod common;

use anyhow::Result;
use common::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_root_and_health() -> Result<()> {
    let app = TestApp::spawn().await?;

    let root = app.client.get(app.url("/")).send().await?;
    assert_eq!(root.status(), StatusCode::OK);
    assert_eq!(root.text().await?, "ichidan server is running.");

    let health = app.client.get(app.url("/health")).send().await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .get(app.url("/api/tags"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_allows_session_header() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/records/1/like"))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "x-session-id")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();
    assert!(allowed.contains("x-session-id"), "got {allowed:?}");
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(app.url("/api/nope")).send().await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
