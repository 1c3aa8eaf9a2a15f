//! The LLM call contract.
//!
//! Every pipeline talks to the model through [`LlmClient`]: an ordered
//! sequence of role-tagged messages plus [`GenerationParams`] in, a single
//! text completion out. Transport/provider failures are unrecoverable for
//! that attempt; there is no internal retry.

mod mock;
mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockLlm;
pub use openai::{LlmSettings, OpenAiClient};

/// Message author on the provider wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One prompt message.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one completion.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    /// temperature 0.7, top_p 1.0, max_tokens 64000.
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            max_tokens: 64_000,
        }
    }
}

/// Failure of one completion attempt.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm provider error: {0}")]
    Provider(String),
    #[error("llm returned an empty completion")]
    EmptyCompletion,
}

/// Uniform call contract for any model backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, LlmError>;
}
