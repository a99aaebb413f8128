//! # Draft Generation Tests
//!
//! Uses a scripted `MockAiProvider` to check prompt construction, the
//! threshold gate and the template fallback.

mod common;

use common::{new_record, setup_db, MockAiProvider};
use ichidan::{
    drafts, providers::db::sqlite::SqliteProvider, records, settings, text::weighted_length,
    themes, DraftPlatform, DraftPrompts, DraftRequest, DraftSource, IchidanError, NewTheme,
    UpdateSettings,
};

/// Creates a theme for alice with `count` records and a threshold of 2.
async fn seed_theme(provider: &SqliteProvider, count: usize) -> i64 {
    let db = &provider.db;
    settings::update_settings(
        db,
        "alice",
        UpdateSettings {
            hide_spoilers: None,
            draft_threshold: Some(2),
        },
    )
    .await
    .unwrap();
    let theme = themes::create_theme(
        db,
        "alice",
        NewTheme {
            name: "朝の習慣".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    for i in 0..count {
        let mut input = new_record(&format!("習慣の本{i}"));
        input.theme_id = Some(theme.id);
        records::create_record(db, "alice", input).await.unwrap();
    }
    theme.id
}

fn request(theme_id: i64, platform: DraftPlatform) -> DraftRequest {
    DraftRequest { theme_id, platform }
}

#[tokio::test]
async fn test_draft_uses_ai_and_renders_prompt() {
    // Arrange
    let provider = setup_db().await;
    let theme_id = seed_theme(&provider, 2).await;
    let ai = MockAiProvider::new(vec![Ok("AIが書いた下書き".to_string())]);

    // Act
    let draft = drafts::generate_draft(
        &provider.db,
        Some(&ai),
        &DraftPrompts::default(),
        "alice",
        request(theme_id, DraftPlatform::Note),
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(draft.source, DraftSource::Ai);
    assert_eq!(draft.content, "AIが書いた下書き");
    assert_eq!(draft.theme_name, "朝の習慣");
    assert_eq!(draft.record_count, 2);
    assert!(!draft.truncated);

    let calls = ai.calls();
    assert_eq!(calls.len(), 1);
    let (_, user_prompt) = &calls[0];
    assert!(user_prompt.contains("朝の習慣"));
    assert!(user_prompt.contains("note"));
    assert!(user_prompt.contains("1. 『習慣の本0』"), "Records are oldest first");
    assert!(user_prompt.contains("2. 『習慣の本1』"));
    assert!(!user_prompt.contains("{records}"));
}

#[tokio::test]
async fn test_custom_prompts_are_used() {
    let provider = setup_db().await;
    let theme_id = seed_theme(&provider, 2).await;
    let ai = MockAiProvider::new(vec![Ok("ok".to_string())]);
    let prompts = DraftPrompts::with_overrides(
        Some("custom system".to_string()),
        Some("{platform}向けに「{theme}」".to_string()),
    );

    drafts::generate_draft(
        &provider.db,
        Some(&ai),
        &prompts,
        "alice",
        request(theme_id, DraftPlatform::Zenn),
    )
    .await
    .unwrap();

    let calls = ai.calls();
    assert_eq!(calls[0].0, "custom system");
    assert_eq!(calls[0].1, "Zenn向けに「朝の習慣」");
}

#[tokio::test]
async fn test_ai_failure_falls_back_to_template() {
    let provider = setup_db().await;
    let theme_id = seed_theme(&provider, 3).await;
    let ai = MockAiProvider::new(vec![Err("upstream exploded".to_string())]);

    let draft = drafts::generate_draft(
        &provider.db,
        Some(&ai),
        &DraftPrompts::default(),
        "alice",
        request(theme_id, DraftPlatform::Zenn),
    )
    .await
    .unwrap();

    assert_eq!(draft.source, DraftSource::Template);
    assert!(draft.content.starts_with("# 朝の習慣"));
    assert!(draft.content.contains("### 習慣の本2"));
}

#[tokio::test]
async fn test_no_provider_uses_template() {
    let provider = setup_db().await;
    let theme_id = seed_theme(&provider, 2).await;

    let draft = drafts::generate_draft(
        &provider.db,
        None,
        &DraftPrompts::default(),
        "alice",
        request(theme_id, DraftPlatform::X),
    )
    .await
    .unwrap();

    assert_eq!(draft.source, DraftSource::Template);
    assert!(draft.content.contains("2件"));
}

#[tokio::test]
async fn test_x_drafts_are_truncated() {
    let provider = setup_db().await;
    let theme_id = seed_theme(&provider, 2).await;
    let ai = MockAiProvider::new(vec![Ok("読".repeat(200))]);

    let draft = drafts::generate_draft(
        &provider.db,
        Some(&ai),
        &DraftPrompts::default(),
        "alice",
        request(theme_id, DraftPlatform::X),
    )
    .await
    .unwrap();

    assert!(draft.truncated);
    assert!(draft.content.ends_with('…'));
    assert!(weighted_length(&draft.content) <= 280);
}

#[tokio::test]
async fn test_threshold_blocks_generation() {
    let provider = setup_db().await;
    let theme_id = seed_theme(&provider, 1).await;
    let ai = MockAiProvider::new(vec![]);

    let err = drafts::generate_draft(
        &provider.db,
        Some(&ai),
        &DraftPrompts::default(),
        "alice",
        request(theme_id, DraftPlatform::X),
    )
    .await
    .unwrap_err();

    match err {
        IchidanError::Validation(message) => assert!(message.contains("1 more")),
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(ai.calls().is_empty(), "AI is not called below the threshold");
}

#[tokio::test]
async fn test_foreign_theme_is_not_found() {
    let provider = setup_db().await;
    let theme_id = seed_theme(&provider, 2).await;

    let err = drafts::generate_draft(
        &provider.db,
        None,
        &DraftPrompts::default(),
        "bob",
        request(theme_id, DraftPlatform::X),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, IchidanError::NotFound(_)));
}
