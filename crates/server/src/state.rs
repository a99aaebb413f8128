//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds all shared resources, such
//! as the configuration, the database provider and the external service clients,
//! making them accessible to all request handlers.

use crate::config::AppConfig;
use chrono::FixedOffset;
use ichidan::{
    prompts::DraftPrompts,
    providers::{
        ai::{AiProvider, OpenAiCompatibleProvider},
        db::sqlite::SqliteProvider,
        identity::{GoogleIdTokenVerifier, IdTokenVerifier},
    },
    stats::offset_from_hours,
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    pub sqlite_provider: Arc<SqliteProvider>,
    /// The draft-writing model. `None` means drafts always use templates.
    pub ai_provider: Option<Arc<dyn AiProvider>>,
    pub id_verifier: Arc<dyn IdTokenVerifier>,
    pub draft_prompts: Arc<DraftPrompts>,
    /// The offset reading days are counted in.
    pub timezone: FixedOffset,
}

/// Builds the shared application state from the configuration.
///
/// This function initializes all necessary services:
/// - the SQLite database, with its schema brought up to date;
/// - the Google ID token verifier;
/// - the optional chat-completion client used for drafts.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if config.jwt_secret.trim().is_empty() {
        anyhow::bail!("jwt_secret must not be empty.");
    }

    let ai_provider: Option<Arc<dyn AiProvider>> = match &config.ai {
        Some(ai) if !ai.api_url.trim().is_empty() => {
            let mut provider = OpenAiCompatibleProvider::new(
                ai.api_url.clone(),
                ai.api_key.clone().filter(|k| !k.is_empty()),
                ai.model_name.clone(),
            )?;
            if let (Some(temperature), Some(max_tokens)) = (ai.temperature, ai.max_tokens) {
                provider = provider.with_sampling(temperature, max_tokens);
            }
            info!(api_url = %ai.api_url, "Draft generation will use the configured AI provider.");
            Some(Arc::new(provider))
        }
        _ => {
            info!("No AI provider configured. Drafts will be generated from templates.");
            None
        }
    };

    let id_verifier = GoogleIdTokenVerifier::new(
        config.google.tokeninfo_url.clone(),
        config.google.client_id.clone().filter(|id| !id.is_empty()),
    )?;

    let draft_prompts = DraftPrompts::with_overrides(
        config.prompts.draft_system_prompt.clone(),
        config.prompts.draft_user_prompt.clone(),
    );

    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    // Ensure the database schema is up-to-date on startup.
    sqlite_provider.initialize_schema().await?;

    let timezone = offset_from_hours(config.timezone_offset_hours);

    Ok(AppState {
        config: Arc::new(config),
        sqlite_provider: Arc::new(sqlite_provider),
        ai_provider,
        id_verifier: Arc::new(id_verifier),
        draft_prompts: Arc::new(draft_prompts),
        timezone,
    })
}
