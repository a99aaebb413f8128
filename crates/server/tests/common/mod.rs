//! # Common Test Utilities
//!
//! This module centralizes the test harness and helper functions used across the
//! `ichidan-server` integration tests. It includes:
//!
//! - `TestApp`: A full application harness that spawns a real server on a random port,
//!   backed by a temporary SQLite file and an `httpmock` server standing in for
//!   Google's tokeninfo endpoint and the chat-completion API.
//! - Helpers to sign users in, craft JWTs and seed records through the API.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::{anyhow, Result};
use axum::serve;
use chrono::Utc;
use httpmock::{Method, MockServer};
use ichidan_server::{
    auth::token::Claims,
    config, router,
    state::{build_app_state, AppState},
    types::ApiResponse,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const GOOGLE_CLIENT_ID: &str = "ichidan-test.apps.googleusercontent.com";
pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const TOKENINFO_PATH: &str = "/tokeninfo";

/// A user signed in through `POST /api/auth/google`.
#[derive(Debug, Clone)]
pub struct SignedInUser {
    pub id: String,
    pub token: String,
    pub role: String,
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with the chat-completion API pointed at the mock server.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_options(true).await
    }

    /// Spawns the server with no AI provider configured.
    pub async fn spawn_without_ai() -> Result<Self> {
        Self::spawn_with_options(false).await
    }

    async fn spawn_with_options(with_ai: bool) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .with_test_writer()
            .try_init();

        let mock_server = MockServer::start_async().await;
        let db_file = NamedTempFile::new()?;
        let db_path = db_file
            .path()
            .to_str()
            .ok_or_else(|| anyhow!("temp db path is not UTF-8"))?
            .to_string();

        let ai_section = if with_ai {
            format!(
                r#"
ai:
  api_url: "{}"
  api_key: "test-key"
  model_name: "mock-chat-model"
"#,
                mock_server.url(CHAT_PATH)
            )
        } else {
            String::new()
        };

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{db_path}"
jwt_secret: "test-jwt-secret"
admin_emails: ["{ADMIN_EMAIL}"]
timezone_offset_hours: 9
google:
  client_id: "{GOOGLE_CLIENT_ID}"
  tokeninfo_url: "{}"
{ai_section}
"#,
            mock_server.url(TOKENINFO_PATH)
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow!("config path is not UTF-8"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let router_state = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(router_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            _db_file: db_file,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a tokeninfo response for `id_token` asserting the given identity.
    pub async fn mock_google_identity(&self, id_token: &str, subject: &str, email: &str) {
        let id_token = id_token.to_string();
        let body = json!({
            "sub": subject,
            "aud": GOOGLE_CLIENT_ID,
            "email": email,
            "email_verified": "true",
            "name": format!("Reader {subject}"),
            "picture": format!("https://example.com/{subject}.png"),
        });
        self.mock_server
            .mock_async(move |when, then| {
                when.method(Method::GET)
                    .path(TOKENINFO_PATH)
                    .query_param("id_token", id_token.as_str());
                then.status(200).json_body(body);
            })
            .await;
    }

    /// Signs in through the Google exchange and returns the issued token.
    pub async fn sign_in(&self, subject: &str, email: &str) -> Result<SignedInUser> {
        let id_token = format!("google-token-{subject}");
        self.mock_google_identity(&id_token, subject, email).await;

        let response = self
            .client
            .post(self.url("/api/auth/google"))
            .json(&json!({ "id_token": id_token }))
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("sign-in failed with {status}: {}", response.text().await?));
        }
        let body: ApiResponse<Value> = response.json().await?;
        Ok(SignedInUser {
            id: body.data["user"]["id"].as_str().unwrap_or_default().to_string(),
            token: body.data["token"].as_str().unwrap_or_default().to_string(),
            role: body.data["user"]["role"].as_str().unwrap_or_default().to_string(),
        })
    }

    /// Crafts a token for `user_id` that expires `expires_in_secs` from now (negative for expired).
    pub fn generate_jwt(&self, user_id: &str, expires_in_secs: i64) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now().timestamp() + expires_in_secs) as usize,
            role: "user".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.app_state.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Opens an anonymous session and returns its id.
    pub async fn create_session(&self) -> Result<String> {
        let response = self.client.post(self.url("/api/sessions")).send().await?;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json().await?;
        Ok(body.data["id"].as_str().unwrap_or_default().to_string())
    }

    /// Logs a record through the API and returns its id.
    pub async fn create_record(&self, token: &str, payload: Value) -> Result<i64> {
        let response = self
            .client
            .post(self.url("/api/records"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(anyhow!(
                "record creation failed with {status}: {}",
                response.text().await?
            ));
        }
        let body: ApiResponse<Value> = response.json().await?;
        body.data["id"]
            .as_i64()
            .ok_or_else(|| anyhow!("record id missing in {}", body.data))
    }

    /// Registers a chat-completion reply for the draft endpoint.
    pub async fn mock_chat_reply(&self, content: &str) -> httpmock::Mock<'_> {
        let body = json!({
            "choices": [{
                "message": { "role": "assistant", "content": content }
            }]
        });
        self.mock_server
            .mock_async(move |when, then| {
                when.method(Method::POST).path(CHAT_PATH);
                then.status(200).json_body(body);
            })
            .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A minimal valid record payload.
pub fn record_payload(title: &str) -> Value {
    json!({
        "title": title,
        "amount": "one_page",
        "learning": format!("{title}で学んだこと"),
        "action": format!("{title}を明日も読む"),
    })
}
