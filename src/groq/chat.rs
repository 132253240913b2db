use crate::config::ChatModelConfig;
use crate::error::{TutorError, TutorResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One message in the shape the completion endpoint expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat-completion boundary consumed by the conversation controller
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request the next assistant reply for the ordered conversation.
    ///
    /// Returns the first choice's content, or `None` when the response
    /// carries no content.
    async fn complete(&self, messages: &[ChatMessage]) -> TutorResult<Option<String>>;
}

// OpenAI-compatible request/response wire types
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Groq chat-completion client.
///
/// The tutor system prompt, model, temperature, and token limit are fixed
/// configuration constants; only the conversation varies per request.
pub struct GroqChat {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    config: ChatModelConfig,
}

impl GroqChat {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        config: ChatModelConfig,
    ) -> TutorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| TutorError::Completion(e.to_string()))?;

        let api_base: String = api_base.into();

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            config,
        })
    }
}

#[async_trait::async_trait]
impl CompletionBackend for GroqChat {
    async fn complete(&self, messages: &[ChatMessage]) -> TutorResult<Option<String>> {
        let url = format!("{}/chat/completions", self.api_base);

        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(ChatMessage {
            role: "system".to_string(),
            content: self.config.system_prompt.clone(),
        });
        wire.extend(messages.iter().cloned());

        let body = ChatRequest {
            model: &self.config.model,
            messages: wire,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TutorError::Completion(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TutorError::Completion(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| TutorError::Completion(format!("response parse failed: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
