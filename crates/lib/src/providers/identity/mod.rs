pub mod google;

use crate::errors::IchidanError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub use google::GoogleIdTokenVerifier;

/// The identity asserted by a verified third-party ID token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// The provider's stable subject identifier.
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Verifies an ID token issued by an identity provider.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync + Debug + DynClone {
    async fn verify(&self, id_token: &str) -> Result<ExternalIdentity, IchidanError>;
}

dyn_clone::clone_trait_object!(IdTokenVerifier);
