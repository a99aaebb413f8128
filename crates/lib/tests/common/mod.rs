#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the library tests: tracing setup, an in-memory
//! database with the schema applied, user seeding and a scripted AI provider.

use async_trait::async_trait;
use dotenvy::dotenv;
use ichidan::{
    providers::{ai::AiProvider, db::sqlite::SqliteProvider},
    IchidanError, NewReadingRecord, ReadingAmount,
};
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Creates an isolated in-memory database with the application schema.
pub async fn setup_db() -> SqliteProvider {
    setup_tracing();
    let provider = SqliteProvider::new(":memory:")
        .await
        .expect("Failed to create SqliteProvider");
    provider
        .initialize_schema()
        .await
        .expect("Failed to initialize schema");
    provider
}

/// Inserts a user row directly so timeline entries can resolve an author name.
pub async fn seed_user(provider: &SqliteProvider, id: &str, display_name: &str) {
    let sql = format!(
        "INSERT INTO users (id, google_sub, email, display_name, role)
         VALUES ('{id}', 'sub-{id}', '{id}@example.com', '{display_name}', 'user')"
    );
    provider
        .initialize_with_data(&sql)
        .await
        .expect("Failed to seed user");
}

/// A minimal valid record for `title`.
pub fn new_record(title: &str) -> NewReadingRecord {
    NewReadingRecord {
        title: title.to_string(),
        link: None,
        amount: ReadingAmount::OnePage,
        learning: format!("{title}から学んだこと"),
        action: format!("{title}を読んで試すこと"),
        notes: None,
        is_spoiler: false,
        theme_id: None,
    }
}

// --- Mock AI Provider ---

/// Replays scripted responses in order and records every prompt it receives.
/// An `Err` entry makes the call fail.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    pub responses: Arc<RwLock<Vec<Result<String, String>>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.call_history.read().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, IchidanError> {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        match self.responses.write().unwrap().pop() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(IchidanError::AiApi(message)),
            None => Ok("Default mock response".to_string()),
        }
    }
}
