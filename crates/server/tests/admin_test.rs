//! # Admin Endpoint Tests
//!
//! This file contains integration tests for the admin-only endpoints,
//! verifying role-based access control.

mod common;

use anyhow::Result;
use common::{TestApp, ADMIN_EMAIL};
use core_access::{get_or_create_user, UserProfile, ROLE_ADMIN};
use ichidan_server::types::ApiResponse;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_get_users_as_admin_succeeds() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let admin = app.sign_in("admin", ADMIN_EMAIL).await?;
    app.sign_in("reader", "reader@example.com").await?;

    // --- 2. Act ---
    let response = app
        .client
        .get(app.url("/api/admin/users"))
        .bearer_auth(&admin.token)
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    let body: ApiResponse<Vec<Value>> = response.json().await?;
    assert_eq!(body.data.len(), 2);
    let roles: Vec<_> = body.data.iter().map(|u| u["role"].as_str().unwrap()).collect();
    assert!(roles.contains(&"admin"));
    assert!(roles.contains(&"user"));
    Ok(())
}

#[tokio::test]
async fn test_get_users_as_regular_user_is_forbidden() -> Result<()> {
    let app = TestApp::spawn().await?;
    let reader = app.sign_in("reader", "reader@example.com").await?;

    let response = app
        .client
        .get(app.url("/api/admin/users"))
        .bearer_auth(&reader.token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Administrator role required.");
    Ok(())
}

#[tokio::test]
async fn test_role_is_read_from_the_database_not_the_token() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let reader = app.sign_in("reader", "reader@example.com").await?;
    // Promote the user directly; the previously issued token still says "user".
    let db = &app.app_state.sqlite_provider.db;
    let profile = UserProfile {
        subject: "reader".to_string(),
        email: Some("reader@example.com".to_string()),
        ..Default::default()
    };
    get_or_create_user(db, &profile, ROLE_ADMIN).await?;

    // --- 2. Act ---
    let response = app
        .client
        .get(app.url("/api/admin/users"))
        .bearer_auth(&reader.token)
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_admin_routes_reject_anonymous_callers() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(app.url("/api/admin/users")).send().await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
