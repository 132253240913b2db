use crate::audio::CaptureConfig;
use crate::error::{TutorError, TutorResult};
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    pub groq: GroqConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqConfig {
    /// Base URL of the OpenAI-compatible API (no trailing slash)
    pub api_base: String,

    /// Bearer credential. Never stored in the config file; injected via
    /// the AI_TUTOR__GROQ__API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub chat: ChatModelConfig,

    #[serde(default)]
    pub transcription: TranscriptionModelConfig,
}

/// Fixed completion parameters. These are configuration constants, not
/// runtime-negotiable per request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatModelConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_chat_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for ChatModelConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            temperature: default_chat_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Fixed transcription parameters (language pinned to one locale;
/// the client pins the decoding temperature to zero).
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionModelConfig {
    #[serde(default = "default_transcription_model")]
    pub model: String,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for TranscriptionModelConfig {
    fn default() -> Self {
        Self {
            model: default_transcription_model(),
            language: default_language(),
        }
    }
}

fn default_chat_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_chat_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_system_prompt() -> String {
    "You are an expert AI tutor. Your role is to help students learn by providing \
     clear explanations, answering questions, and guiding them through problems \
     step by step. Be encouraging, patient, and adapt your teaching style to help \
     students understand concepts effectively. Always break down complex topics \
     into digestible parts."
        .to_string()
}

fn default_transcription_model() -> String {
    "whisper-large-v3-turbo".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("AI_TUTOR").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl GroqConfig {
    /// The API credential, required at startup.
    pub fn require_api_key(&self) -> TutorResult<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TutorError::Config(
                    "Groq API key not set; export AI_TUTOR__GROQ__API_KEY".to_string(),
                )
            })
    }
}
