use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::chat_service::{AiConfig, CompletionResponse, WireMessage};
use crate::collaborators::{ChatMessage, EngagementEvaluator, EngagementVerdict};
use crate::error::EvaluatorError;

const VERDICT_SYSTEM_PROMPT: &str = "Your job is to determine whether the student has made a \
good faith effort to engage with some concepts in the following text. A good faith response \
will include some attempt to articulate an idea. It can be a summary. It can be a new question. \
It can be vague. But it should not be a one-word response, a verbatim copying of part of the \
original text, or a zero-effort answer.\n\nYou should respond with a JSON object in the format:\n\
{\n\"engaged\": true, // or false\n\"engagement_score\": 7, // on a scale of 1-10\n\
\"reason\": \"string\" // a few words explaining the score\n}";

/// Engagement evaluator backed by an OpenAI-compatible completions endpoint.
///
/// Asks for a JSON verdict at low temperature. Callers treat any error from
/// [`EngagementEvaluator::evaluate`] as "not engaged"; the volume-based
/// advance path keeps working either way.
#[derive(Clone)]
pub struct OpenAiEngagementService {
    client: Client,
    config: Option<AiConfig>,
}

impl OpenAiEngagementService {
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
impl EngagementEvaluator for OpenAiEngagementService {
    async fn evaluate(
        &self,
        section_text: &str,
        recent_exchanges: &[ChatMessage],
    ) -> Result<EngagementVerdict, EvaluatorError> {
        let config = self.config.as_ref().ok_or(EvaluatorError::Disabled)?;

        let conversation = recent_exchanges
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let payload = VerdictRequest {
            model: config.model.clone(),
            messages: vec![
                WireMessage {
                    role: "system",
                    content: format!("{VERDICT_SYSTEM_PROMPT}\n\nHere is the text:\n{section_text}"),
                },
                WireMessage {
                    role: "user",
                    content: format!(
                        "Here is the text:\n{section_text}\n\nHere is the conversation the \
                         student has had about this text:\n{conversation}"
                    ),
                },
            ],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(config.completions_url())
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EvaluatorError::HttpStatus(response.status()));
        }

        let body: CompletionResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let verdict: EngagementVerdict = serde_json::from_str(&content)?;
        Ok(verdict)
    }
}

#[derive(Debug, Serialize)]
struct VerdictRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}
