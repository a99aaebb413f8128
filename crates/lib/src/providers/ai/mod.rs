pub mod openai;

use crate::errors::IchidanError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

pub use openai::OpenAiCompatibleProvider;

/// A trait for interacting with an AI provider.
///
/// Draft generation only needs a single-turn exchange: a system prompt that
/// sets the writing rules and a user prompt carrying the reading records.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, IchidanError>;
}

dyn_clone::clone_trait_object!(AiProvider);
