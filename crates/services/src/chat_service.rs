use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::collaborators::{ChatCollaborator, ChatMessage, ChatRole, ExchangeContext};
use crate::error::ChatError;

/// Shared configuration for the OpenAI-style collaborator services.
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LTD_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("LTD_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("LTD_AI_MODEL").unwrap_or_else(|_| "gpt-4o".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Chat collaborator backed by an OpenAI-compatible completions endpoint.
#[derive(Clone)]
pub struct OpenAiChatService {
    client: Client,
    config: Option<AiConfig>,
}

impl OpenAiChatService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl ChatCollaborator for OpenAiChatService {
    async fn send_exchange(
        &self,
        context: &ExchangeContext,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Result<String, ChatError> {
        let config = self.config.as_ref().ok_or(ChatError::Disabled)?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: "system",
            content: context.system_prompt.clone(),
        });
        for message in history {
            messages.push(WireMessage {
                role: match message.role {
                    ChatRole::System => "system",
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                content: message.content.clone(),
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: user_text.to_string(),
        });

        let payload = CompletionRequest {
            model: config.model.clone(),
            messages,
            temperature: 0.7,
            max_tokens: 800,
        };

        let response = self
            .client
            .post(config.completions_url())
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::HttpStatus(response.status()));
        }

        let body: CompletionResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage {
    pub(crate) role: &'static str,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    pub(crate) choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub(crate) message: WireMessageResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMessageResponse {
    pub(crate) content: Option<String>,
}
