//! # Application Configuration
//!
//! This module defines the configuration structure for the `ichidan-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The HMAC secret for application JWTs. Loaded from `JWT_SECRET` env var.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// How long an issued JWT stays valid.
    #[serde(default = "default_jwt_ttl_secs")]
    pub jwt_ttl_secs: u64,
    /// Users signing in with one of these e-mails get the `admin` role.
    #[serde(default)]
    pub admin_emails: Vec<String>,
    /// Browser origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    /// The UTC offset reading days are counted in.
    #[serde(default = "default_timezone_offset_hours")]
    pub timezone_offset_hours: i32,
    #[serde(default)]
    pub google: GoogleConfig,
    /// The chat-completion endpoint for drafts. Drafts use templates when absent.
    #[serde(default)]
    pub ai: Option<AiConfig>,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

fn default_port() -> u16 {
    9090
}

fn default_db_url() -> String {
    ichidan::constants::DEFAULT_DB_FILE.to_string()
}

fn default_jwt_secret() -> String {
    "a-secure-secret-key".to_string()
}

fn default_jwt_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_timezone_offset_hours() -> i32 {
    ichidan::constants::DEFAULT_TIMEZONE_OFFSET_HOURS
}

fn default_tokeninfo_url() -> String {
    ichidan::providers::identity::google::GOOGLE_TOKENINFO_URL.to_string()
}

/// Google sign-in settings.
#[derive(Debug, Deserialize, Clone)]
pub struct GoogleConfig {
    /// The OAuth client id ID tokens must be issued for. Unchecked when unset.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_tokeninfo_url")]
    pub tokeninfo_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            tokeninfo_url: default_tokeninfo_url(),
        }
    }
}

/// An OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Overrides for the draft prompt templates.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PromptsConfig {
    #[serde(default)]
    pub draft_system_prompt: Option<String>,
    #[serde(default)]
    pub draft_user_prompt: Option<String>,
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, lowest priority first:
/// 1. Defaults baked into `AppConfig`.
/// 2. `config.yml` next to the crate manifest, or `config_path_override`.
///    `${VAR}` references in the file are replaced from the environment.
/// 3. Plain environment variables for top-level keys (`PORT`, `DB_URL`, `JWT_SECRET`).
/// 4. `ICHIDAN_` prefixed variables for nested keys (e.g. `ICHIDAN_GOOGLE__CLIENT_ID`).
///    `ICHIDAN_ADMIN_EMAILS` and `ICHIDAN_CORS_ALLOWED_ORIGINS` take comma-separated lists.
///
/// An explicit override path must exist; the default `config.yml` is optional.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    let main_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            let content = read_and_substitute(&user_config_path)?;
            if content.is_some() {
                info!("Loading user-defined configuration from '{user_config_path}'.");
            } else {
                info!("'{user_config_path}' not found. Using defaults and environment.");
            }
            content
        }
    };
    if let Some(content) = main_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("ICHIDAN")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("admin_emails")
                .with_list_parse_key("cors_allowed_origins"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
