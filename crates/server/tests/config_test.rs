//! # Configuration Tests
//!
//! Environment variables are process-global, so every test that touches them
//! runs under `#[serial]`.

use ichidan_server::config::{get_config, ConfigError};
use serial_test::serial;
use std::{env, fs};
use tempfile::tempdir;

/// Clears every environment variable `get_config` reads in these tests.
fn clear_env_vars() {
    for var in [
        "PORT",
        "DB_URL",
        "JWT_SECRET",
        "ICHIDAN_TEST_CLIENT_ID",
        "ICHIDAN_JWT_TTL_SECS",
        "ICHIDAN_ADMIN_EMAILS",
        "ICHIDAN_CORS_ALLOWED_ORIGINS",
        "ICHIDAN_GOOGLE__CLIENT_ID",
        "ICHIDAN_AI__API_URL",
        "ICHIDAN_AI__MODEL_NAME",
    ] {
        env::remove_var(var);
    }
}

fn write_config(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, content).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

#[test]
#[serial]
fn test_defaults_apply_when_keys_are_missing() {
    clear_env_vars();
    let (_dir, path) = write_config("port: 9090\n");

    let config = get_config(Some(&path)).expect("config should load");

    assert_eq!(config.port, 9090);
    assert_eq!(config.db_url, "db/ichidan.db");
    assert_eq!(config.jwt_secret, "a-secure-secret-key");
    assert_eq!(config.jwt_ttl_secs, 7 * 24 * 60 * 60);
    assert_eq!(config.timezone_offset_hours, 9);
    assert!(config.admin_emails.is_empty());
    assert!(config.cors_allowed_origins.is_empty());
    assert!(config.google.client_id.is_none());
    assert_eq!(
        config.google.tokeninfo_url,
        "https://oauth2.googleapis.com/tokeninfo"
    );
    assert!(config.ai.is_none());
    assert!(config.prompts.draft_user_prompt.is_none());
}

#[test]
#[serial]
fn test_yaml_values_and_env_substitution() {
    clear_env_vars();
    env::set_var("ICHIDAN_TEST_CLIENT_ID", "from-env.apps.googleusercontent.com");
    let (_dir, path) = write_config(
        r#"
port: 8081
db_url: "/tmp/ichidan-test.db"
admin_emails: ["owner@example.com"]
timezone_offset_hours: 0
google:
  client_id: "${ICHIDAN_TEST_CLIENT_ID}"
ai:
  api_url: "http://localhost:11434/v1/chat/completions"
  model_name: "gemma"
  temperature: 0.5
  max_tokens: 800
prompts:
  draft_system_prompt: "あなたは編集者です。"
"#,
    );

    let config = get_config(Some(&path)).expect("config should load");

    assert_eq!(config.port, 8081);
    assert_eq!(config.db_url, "/tmp/ichidan-test.db");
    assert_eq!(config.admin_emails, vec!["owner@example.com".to_string()]);
    assert_eq!(config.timezone_offset_hours, 0);
    assert_eq!(
        config.google.client_id.as_deref(),
        Some("from-env.apps.googleusercontent.com")
    );
    let ai = config.ai.expect("ai section should parse");
    assert_eq!(ai.model_name.as_deref(), Some("gemma"));
    assert_eq!(ai.api_key, None);
    assert_eq!(ai.temperature, Some(0.5));
    assert_eq!(ai.max_tokens, Some(800));
    assert_eq!(
        config.prompts.draft_system_prompt.as_deref(),
        Some("あなたは編集者です。")
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env_vars();
    env::set_var("PORT", "7070");
    env::set_var("JWT_SECRET", "env-secret");
    env::set_var("ICHIDAN_JWT_TTL_SECS", "3600");
    env::set_var("ICHIDAN_ADMIN_EMAILS", "a@example.com,b@example.com");
    env::set_var("ICHIDAN_GOOGLE__CLIENT_ID", "env-client");
    let (_dir, path) = write_config(
        r#"
port: 8081
jwt_secret: "file-secret"
google:
  client_id: "file-client"
"#,
    );

    let config = get_config(Some(&path)).expect("config should load");

    assert_eq!(config.port, 7070);
    assert_eq!(config.jwt_secret, "env-secret");
    assert_eq!(config.jwt_ttl_secs, 3600);
    assert_eq!(
        config.admin_emails,
        vec!["a@example.com".to_string(), "b@example.com".to_string()]
    );
    assert_eq!(config.google.client_id.as_deref(), Some("env-client"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_override_file_is_an_error() {
    clear_env_vars();

    let result = get_config(Some("/definitely/not/here/config.yml"));

    match result {
        Err(ConfigError::NotFound(msg)) => assert!(msg.contains("/definitely/not/here")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
