//! OpenAI-compatible API client.
//!
//! Talks to any OpenAI-compatible endpoint via `async_openai` with a
//! configurable base URL: OpenAI itself, a vertex/claude proxy, a local
//! server, etc.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::{GenerationParams, LlmClient, LlmError, Message, Role};

/// Provider settings, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL of the OpenAI-compatible endpoint (APPFORGE_BASE_URL).
    pub base_url: Option<String>,
    /// Model name passed on every request (APPFORGE_MODEL).
    pub model: String,
    /// API key (APPFORGE_API_KEY, falling back to OPENAI_API_KEY).
    pub api_key: Option<String>,
}

impl LlmSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("APPFORGE_BASE_URL").ok(),
            model: std::env::var("APPFORGE_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            api_key: std::env::var("APPFORGE_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
        }
    }
}

/// OpenAI-compatible client: holds the provider `Client` and model name,
/// converts [`Message`]s to the API shape and takes the first choice's
/// content.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(settings: &LlmSettings) -> Self {
        let api_key = settings
            .api_key
            .clone()
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = match &settings.base_url {
            Some(url) => OpenAIConfig::new().with_api_base(url).with_api_key(api_key),
            None => OpenAIConfig::new().with_api_key(api_key),
        };

        Self {
            client: Client::with_config(config),
            model: settings.model.clone(),
        }
    }

    fn to_openai_messages(
        &self,
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        messages
            .iter()
            .map(|m| {
                let converted = match m.role {
                    Role::System => ChatCompletionRequestSystemMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map(ChatCompletionRequestMessage::System),
                    Role::User => ChatCompletionRequestUserMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map(ChatCompletionRequestMessage::User),
                    Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map(ChatCompletionRequestMessage::Assistant),
                };
                converted.map_err(|e| LlmError::Provider(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.to_openai_messages(messages)?)
            .temperature(params.temperature)
            .top_p(params.top_p)
            .max_tokens(params.max_tokens)
            .build()
            .map_err(|e| LlmError::Provider(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Provider(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}
