//! # Google ID Token Verification
//!
//! Google ID tokens are verified by asking Google's `tokeninfo` endpoint to
//! decode them. The endpoint checks the signature and expiry; this module
//! checks the audience and that the e-mail address was verified.

use super::{ExternalIdentity, IdTokenVerifier};
use crate::errors::IchidanError;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Deserialize, Debug)]
struct TokenInfo {
    sub: String,
    #[serde(default)]
    aud: Option<String>,
    #[serde(default)]
    email: Option<String>,
    /// Google returns this as the string `"true"`; accept booleans too.
    #[serde(default)]
    email_verified: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl TokenInfo {
    fn email_is_verified(&self) -> bool {
        match &self.email_verified {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GoogleIdTokenVerifier {
    client: ReqwestClient,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleIdTokenVerifier {
    /// Creates a verifier. When `client_id` is `None` the audience is not checked,
    /// which is only acceptable for local development.
    pub fn new(tokeninfo_url: String, client_id: Option<String>) -> Result<Self, IchidanError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(IchidanError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            tokeninfo_url,
            client_id,
        })
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<ExternalIdentity, IchidanError> {
        if id_token.trim().is_empty() {
            return Err(IchidanError::Identity("The ID token is empty.".to_string()));
        }

        debug!(url = %self.tokeninfo_url, "--> Verifying Google ID token");
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| IchidanError::Identity(format!("tokeninfo request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Google rejected the ID token with status {status}");
            return Err(IchidanError::Identity(format!(
                "Google rejected the ID token ({status})."
            )));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| IchidanError::Identity(format!("Malformed tokeninfo response: {e}")))?;

        if let Some(expected) = &self.client_id {
            if info.aud.as_deref() != Some(expected.as_str()) {
                warn!(aud = ?info.aud, "ID token audience mismatch");
                return Err(IchidanError::Identity(
                    "The ID token was issued for a different client.".to_string(),
                ));
            }
        }

        if info.email.is_some() && !info.email_is_verified() {
            return Err(IchidanError::Identity(
                "The Google account e-mail is not verified.".to_string(),
            ));
        }

        Ok(ExternalIdentity {
            subject: info.sub,
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }
}
